use crate::error::StateError;

use super::{Backend, CommandOutput};

/// Drives the management tool as a child process.
pub struct ProcessBackend {
    tool: String,
}

impl ProcessBackend {
    pub fn new(tool: &str) -> Self {
        Self { tool: tool.into() }
    }
}

impl Backend for ProcessBackend {
    async fn run(&self, args: &[String]) -> Result<CommandOutput, StateError> {
        tracing::debug!(command = %self.render(args), "running backend");

        let output = tokio::process::Command::new(&self.tool)
            .args(args)
            .output()
            .await
            .map_err(|e| StateError::Io {
                context: format!("running {}", self.tool),
                source: e,
            })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(code = ?result.code, stderr = %result.stderr.trim(), "backend exited");
        Ok(result)
    }

    fn program(&self) -> &str {
        &self.tool
    }
}
