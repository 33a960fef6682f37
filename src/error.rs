use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum StateError {
    #[error("failed to load settings from {path}")]
    ConfigLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings from {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("no VM found with alias '{alias}'")]
    #[diagnostic(help("check the alias, or address the VM by --uuid"))]
    IdentityNotFound { alias: String },

    #[error("`{command}` failed: {message}")]
    BackendQuery { command: String, message: String },

    #[error("`{command}` failed: {message}")]
    BackendCommand { command: String, message: String },

    #[error("{context}")]
    #[diagnostic(help("is the backend tool installed? override it with --tool"))]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl StateError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        StateError::Validation {
            message: message.into(),
        }
    }
}
