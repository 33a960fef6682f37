pub mod process;

#[cfg(test)]
pub mod fake;

use crate::config::Settings;
use crate::error::StateError;

/// Captured result of one backend invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Best available failure text: the error stream, else the exit status.
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

#[allow(async_fn_in_trait)] // trait is internal-only
pub trait Backend {
    /// Run the management tool with `args` and wait for it to exit.
    async fn run(&self, args: &[String]) -> Result<CommandOutput, StateError>;

    /// Program name used when rendering invocations in logs and errors.
    fn program(&self) -> &str;

    fn render(&self, args: &[String]) -> String {
        let mut line = self.program().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

pub fn create_backend(settings: &Settings) -> process::ProcessBackend {
    process::ProcessBackend::new(&settings.tool)
}
