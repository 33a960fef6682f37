use crate::backend::Backend;
use crate::dispatch;
use crate::error::StateError;

/// How the caller addressed the VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Alias(String),
    Uuid(String),
}

/// Ask the backend which VM carries `alias`.
///
/// Duplicate aliases are not re-validated: the first line the backend prints wins.
pub async fn lookup<B: Backend>(backend: &B, alias: &str) -> Result<Option<String>, StateError> {
    let args = dispatch::lookup_args(alias);
    let output = backend.run(&args).await?;
    if !output.success() {
        return Err(StateError::BackendQuery {
            command: backend.render(&args),
            message: output.failure_message(),
        });
    }
    let found = output
        .stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string);
    tracing::debug!(alias, found = ?found, "looked up alias");
    Ok(found)
}

/// Canonical identifier for `identity`; a uuid is trusted without a lookup.
pub async fn resolve<B: Backend>(backend: &B, identity: &Identity) -> Result<String, StateError> {
    match identity {
        Identity::Uuid(id) => Ok(id.clone()),
        Identity::Alias(alias) => {
            lookup(backend, alias)
                .await?
                .ok_or_else(|| StateError::IdentityNotFound {
                    alias: alias.clone(),
                })
        }
    }
}
