//! Comparison-stable fingerprints of a VM's configuration.
//!
//! The backend has no "did anything change" signal for updates, so the
//! configuration dump is normalized and hashed before and after the call.

use std::hash::{DefaultHasher, Hash, Hasher};

use serde_json::Value;

use crate::backend::Backend;
use crate::dispatch;
use crate::error::StateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    hash: String,
}

impl Snapshot {
    /// Fetch `get <id>` from the backend and fingerprint it.
    pub async fn take<B: Backend>(
        backend: &B,
        id: &str,
        volatile_fields: &[String],
    ) -> Result<Self, StateError> {
        let args = dispatch::get_args(id);
        let command = backend.render(&args);
        let output = backend.run(&args).await?;
        if !output.success() {
            return Err(StateError::BackendQuery {
                command,
                message: output.failure_message(),
            });
        }

        let value: Value =
            serde_json::from_str(&output.stdout).map_err(|e| StateError::BackendQuery {
                command: command.clone(),
                message: format!("configuration dump is not valid JSON: {e}"),
            })?;

        let snapshot = Self::from_value(value, volatile_fields).map_err(|message| {
            StateError::BackendQuery { command, message }
        })?;
        tracing::debug!(id, hash = %snapshot.hash, "took snapshot");
        Ok(snapshot)
    }

    /// Strip volatile top-level fields and hash the canonical serialization.
    pub fn from_value(value: Value, volatile_fields: &[String]) -> Result<Self, String> {
        let Value::Object(mut fields) = value else {
            return Err("configuration dump is not a JSON object".into());
        };
        for name in volatile_fields {
            fields.remove(name);
        }

        // serde_json maps are key-sorted, so the serialization is canonical
        let canonical = Value::Object(fields).to_string();
        let mut hasher = DefaultHasher::new();
        canonical.hash(&mut hasher);
        Ok(Self {
            hash: format!("{:016x}", hasher.finish()),
        })
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}
