use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::dispatch::DesiredState;
use crate::request::Request;

#[derive(Parser, Debug)]
#[command(
    name = "vmstate",
    about = "Converge a hypervisor-managed VM to a declared state"
)]
pub struct Cli {
    /// Desired state of the VM
    #[arg(long, value_enum)]
    pub state: DesiredState,

    /// Canonical VM identifier
    #[arg(long, visible_alias = "identifier")]
    pub uuid: Option<String>,

    /// VM alias, resolved to its uuid through the backend
    #[arg(long)]
    pub alias: Option<String>,

    /// JSON manifest for creation or full update
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Whitespace-separated key=value pairs for a partial update
    #[arg(long)]
    pub property_list: Option<String>,

    /// Skip graceful shutdown for stopped/rebooted/absent
    #[arg(short = 'F', long)]
    pub force: bool,

    /// Backend management tool (overrides settings)
    #[arg(long)]
    pub tool: Option<String>,

    /// Path to settings file [default: vmstate.toml if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Result format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Enable verbose logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Plain,
}

impl Cli {
    pub fn request(&self) -> Request {
        Request {
            state: self.state,
            identifier: self.uuid.clone(),
            alias: self.alias.clone(),
            manifest: self.manifest.clone(),
            property_list: self.property_list.clone(),
            force: self.force,
        }
    }
}
