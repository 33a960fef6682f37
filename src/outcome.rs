use serde::Serialize;

use crate::backend::CommandOutput;
use crate::error::StateError;
use crate::snapshot::Snapshot;

/// Prefix the backend writes to its error stream when a lifecycle verb
/// actually did something. Overridable through `success_marker` in settings.
pub const DEFAULT_SUCCESS_MARKER: &str = "Successfully";

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub changed: bool,
    pub message: String,
}

impl Outcome {
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            message: String::new(),
        }
    }
}

/// Fail with `BackendCommand` unless the mutating invocation exited zero.
pub fn ensure_success(command: &str, output: &CommandOutput) -> Result<(), StateError> {
    if output.success() {
        return Ok(());
    }
    Err(StateError::BackendCommand {
        command: command.to_string(),
        message: output.failure_message(),
    })
}

pub fn reports_success(stderr: &str, marker: &str) -> bool {
    stderr.starts_with(marker)
}

/// start/stop/reboot/destroy: changed iff the error stream carries the marker.
pub fn classify_lifecycle(
    command: &str,
    output: &CommandOutput,
    marker: &str,
) -> Result<Outcome, StateError> {
    ensure_success(command, output)?;
    Ok(Outcome {
        changed: reports_success(&output.stderr, marker),
        message: output.stderr.trim().to_string(),
    })
}

/// create: `None` means the dispatch was skipped because the VM already exists.
pub fn classify_create(
    command: &str,
    output: Option<&CommandOutput>,
) -> Result<Outcome, StateError> {
    let Some(output) = output else {
        return Ok(Outcome::unchanged());
    };
    ensure_success(command, output)?;
    Ok(Outcome {
        changed: true,
        message: output.stderr.trim().to_string(),
    })
}

/// update: only a snapshot difference counts, whatever the backend printed.
pub fn classify_update(output: &CommandOutput, before: &Snapshot, after: &Snapshot) -> Outcome {
    if before == after {
        return Outcome::unchanged();
    }
    let message = match output.stderr.trim() {
        "" => "VM configuration updated".to_string(),
        text => text.to_string(),
    };
    Outcome {
        changed: true,
        message,
    }
}
