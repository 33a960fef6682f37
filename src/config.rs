use std::path::Path;

use facet::Facet;

use crate::error::StateError;
use crate::outcome::DEFAULT_SUCCESS_MARKER;

/// Settings file consulted when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "vmstate.toml";

/// Management tool invoked when neither settings nor `--tool` name one.
pub const DEFAULT_TOOL: &str = "vmadm";

/// Fields that change on every write without changing the VM's configuration.
pub const DEFAULT_VOLATILE_FIELDS: &[&str] = &["last_modified"];

/// Host-level settings describing the backend tool.
#[derive(Debug, Clone, Facet)]
#[facet(default)]
pub struct Settings {
    #[facet(default = "vmadm")]
    pub tool: String,
    #[facet(default = "Successfully")]
    pub success_marker: String,
    /// Top-level snapshot fields stripped before hashing.
    pub volatile_fields: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.into(),
            success_marker: DEFAULT_SUCCESS_MARKER.into(),
            volatile_fields: None,
        }
    }
}

impl Settings {
    pub fn volatile_fields(&self) -> Vec<String> {
        match &self.volatile_fields {
            Some(fields) => fields.clone(),
            None => DEFAULT_VOLATILE_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

// ── validation ────────────────────────────────────────────

fn validate_settings(settings: &Settings) -> Result<(), StateError> {
    if settings.tool.trim().is_empty() {
        return Err(StateError::validation("tool must not be empty"));
    }
    if settings.success_marker.is_empty() {
        return Err(StateError::validation("success_marker must not be empty"));
    }
    let empty_field = settings
        .volatile_fields
        .as_ref()
        .is_some_and(|fields| fields.iter().any(|f| f.is_empty()));
    if empty_field {
        return Err(StateError::validation(
            "volatile_fields must not contain empty names",
        ));
    }
    Ok(())
}

// ── public API ────────────────────────────────────────────

pub fn parse_settings(contents: &str, path: &Path) -> Result<Settings, StateError> {
    let settings: Settings =
        facet_toml::from_str(contents).map_err(|e| StateError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    validate_settings(&settings)?;
    Ok(settings)
}

/// Load settings from `path`, or from [`DEFAULT_CONFIG`] if it exists.
///
/// An explicitly named file must exist; a missing default file means defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, StateError> {
    let path = match path {
        Some(p) => p,
        None => {
            let default = Path::new(DEFAULT_CONFIG);
            if !default.exists() {
                return Ok(Settings::default());
            }
            default
        }
    };

    let contents = std::fs::read_to_string(path).map_err(|source| StateError::ConfigLoad {
        path: path.display().to_string(),
        source,
    })?;
    let settings = parse_settings(&contents, path)?;
    tracing::debug!(path = %path.display(), tool = %settings.tool, "loaded settings");
    Ok(settings)
}
