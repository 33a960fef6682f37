//! Translation of a desired state into backend argument lists.
//!
//! Every state maps to exactly one verb through [`DesiredState::verb`]; the
//! argument lists below are the only place backend syntax is spelled out.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

/// Flag appended to skip the graceful shutdown path.
pub const FORCE_FLAG: &str = "-F";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DesiredState {
    Present,
    Absent,
    Started,
    Stopped,
    Rebooted,
    Updated,
}

/// Backend verbs, one per desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Create,
    Destroy,
    Start,
    Stop,
    Reboot,
    Update,
}

impl DesiredState {
    pub fn verb(self) -> Verb {
        match self {
            DesiredState::Present => Verb::Create,
            DesiredState::Absent => Verb::Destroy,
            DesiredState::Started => Verb::Start,
            DesiredState::Stopped => Verb::Stop,
            DesiredState::Rebooted => Verb::Reboot,
            DesiredState::Updated => Verb::Update,
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DesiredState::Present => "present",
            DesiredState::Absent => "absent",
            DesiredState::Started => "started",
            DesiredState::Stopped => "stopped",
            DesiredState::Rebooted => "rebooted",
            DesiredState::Updated => "updated",
        };
        f.write_str(s)
    }
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Create => "create",
            Verb::Destroy => "destroy",
            Verb::Start => "start",
            Verb::Stop => "stop",
            Verb::Reboot => "reboot",
            Verb::Update => "update",
        }
    }

    /// Whether the backend offers a forced variant of this verb.
    pub fn accepts_force(self) -> bool {
        matches!(self, Verb::Stop | Verb::Reboot | Verb::Destroy)
    }
}

/// Payload of an `update` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePayload {
    /// Already-validated `key=value` tokens.
    Properties(Vec<String>),
    Manifest(PathBuf),
}

/// A mutating backend invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Create { manifest: PathBuf },
    Lifecycle { verb: Verb, id: String, force: bool },
    Update { id: String, payload: UpdatePayload },
}

impl Invocation {
    /// Lifecycle invocation for `verb`; `force` is dropped for verbs without a forced form.
    pub fn lifecycle(verb: Verb, id: &str, force: bool) -> Self {
        let force = force && verb.accepts_force();
        Invocation::Lifecycle {
            verb,
            id: id.to_string(),
            force,
        }
    }

    pub fn verb(&self) -> Verb {
        match self {
            Invocation::Create { .. } => Verb::Create,
            Invocation::Lifecycle { verb, .. } => *verb,
            Invocation::Update { .. } => Verb::Update,
        }
    }

    pub fn args(&self) -> Vec<String> {
        match self {
            Invocation::Create { manifest } => manifest_args(Verb::Create, None, manifest),
            Invocation::Lifecycle { verb, id, force } => {
                let mut args = vec![verb.as_str().to_string(), id.clone()];
                if *force {
                    args.push(FORCE_FLAG.to_string());
                }
                args
            }
            Invocation::Update {
                id,
                payload: UpdatePayload::Properties(props),
            } => {
                let mut args = vec![Verb::Update.as_str().to_string(), id.clone()];
                args.extend(props.iter().cloned());
                args
            }
            Invocation::Update {
                id,
                payload: UpdatePayload::Manifest(path),
            } => manifest_args(Verb::Update, Some(id.as_str()), path),
        }
    }
}

fn manifest_args(verb: Verb, id: Option<&str>, manifest: &Path) -> Vec<String> {
    let mut args = vec![verb.as_str().to_string()];
    if let Some(id) = id {
        args.push(id.to_string());
    }
    args.push("-f".to_string());
    args.push(manifest.display().to_string());
    args
}

// ── queries ──────────────────────────────────────────────

pub fn lookup_args(alias: &str) -> Vec<String> {
    vec!["lookup".to_string(), format!("alias={alias}")]
}

pub fn get_args(id: &str) -> Vec<String> {
    vec!["get".to_string(), id.to_string()]
}
