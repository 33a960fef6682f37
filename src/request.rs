use std::path::PathBuf;

use crate::dispatch::{DesiredState, UpdatePayload};
use crate::error::StateError;
use crate::identity::Identity;
use crate::manifest;

/// Everything one reconciliation pass is asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub state: DesiredState,
    pub identifier: Option<String>,
    pub alias: Option<String>,
    pub manifest: Option<PathBuf>,
    pub property_list: Option<String>,
    pub force: bool,
}

impl Request {
    pub fn new(state: DesiredState) -> Self {
        Self {
            state,
            identifier: None,
            alias: None,
            manifest: None,
            property_list: None,
            force: false,
        }
    }

    /// The VM this request addresses. Exactly one of identifier/alias must be set.
    pub fn identity(&self) -> Result<Identity, StateError> {
        match (non_empty(&self.identifier), non_empty(&self.alias)) {
            (Some(id), None) => Ok(Identity::Uuid(id.to_string())),
            (None, Some(alias)) => Ok(Identity::Alias(alias.to_string())),
            (Some(_), Some(_)) => Err(StateError::validation(
                "uuid and alias are mutually exclusive",
            )),
            (None, None) => Err(StateError::validation(format!(
                "state '{}' requires a uuid or an alias",
                self.state
            ))),
        }
    }

    /// The update payload. Exactly one of property list/manifest must be set.
    pub fn update_payload(&self) -> Result<UpdatePayload, StateError> {
        let manifest = self.manifest.as_ref().filter(|p| !p.as_os_str().is_empty());
        match (non_empty(&self.property_list), manifest) {
            (Some(list), None) => parse_properties(list).map(UpdatePayload::Properties),
            (None, Some(path)) => {
                manifest::ensure_exists(path)?;
                Ok(UpdatePayload::Manifest(path.clone()))
            }
            (Some(_), Some(_)) => Err(StateError::validation(
                "property list and manifest are mutually exclusive",
            )),
            (None, None) => Err(StateError::validation(
                "state 'updated' requires a property list or a manifest",
            )),
        }
    }

    pub fn manifest_path(&self) -> Result<&PathBuf, StateError> {
        self.manifest
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                StateError::validation(format!("state '{}' requires a manifest", self.state))
            })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Split a whitespace-separated `key=value` list, rejecting malformed tokens.
pub fn parse_properties(list: &str) -> Result<Vec<String>, StateError> {
    let tokens: Vec<String> = list.split_whitespace().map(str::to_string).collect();
    if tokens.is_empty() {
        return Err(StateError::validation("property list is empty"));
    }
    for token in &tokens {
        match token.split_once('=') {
            Some((key, _)) if !key.is_empty() => {}
            _ => {
                return Err(StateError::validation(format!(
                    "property '{token}' is not of the form key=value"
                )));
            }
        }
    }
    Ok(tokens)
}
