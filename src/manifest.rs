use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::StateError;

/// A creation manifest. Only the alias is looked at; the rest is the backend's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub path: PathBuf,
    pub alias: String,
}

/// Fail unless `path` names an existing file.
pub fn ensure_exists(path: &Path) -> Result<(), StateError> {
    if !path.is_file() {
        return Err(StateError::validation(format!(
            "manifest does not exist: {}",
            path.display()
        )));
    }
    Ok(())
}

pub fn load(path: &Path) -> Result<Manifest, StateError> {
    ensure_exists(path)?;

    let contents = std::fs::read_to_string(path).map_err(|e| {
        StateError::validation(format!("failed to read manifest {}: {e}", path.display()))
    })?;

    let value: Value = serde_json::from_str(&contents).map_err(|e| {
        StateError::validation(format!("manifest is not valid JSON: {}: {e}", path.display()))
    })?;

    let alias = value
        .as_object()
        .and_then(|obj| obj.get("alias"))
        .and_then(Value::as_str)
        .filter(|alias| !alias.is_empty())
        .ok_or_else(|| {
            StateError::validation(format!(
                "manifest has no alias field: {}",
                path.display()
            ))
        })?;

    Ok(Manifest {
        path: path.to_path_buf(),
        alias: alias.to_string(),
    })
}
