//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the operator tool using
//! the `clap` crate. Global flags are merged over the TOML file and environment
//! variables when the configuration is loaded.

use clap::{Args, Parser, Subcommand};
use figment::{
    value::{Dict, Map, Tag, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Sends snapshotter issue reports to the configured reporting sinks.
#[derive(Parser, Debug, Default, Clone)]
#[command(
    author,
    version,
    about,
    long_about = None,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (overrides the configuration file).
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log delivery failures with their full cause chain.
    #[arg(long, global = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Report a snapshotter issue to the reporting service and chat-ops webhook.
    Issue(IssueArgs),
    /// Send a report through the Telegram bot gateway.
    Chat(ChatArgs),
}

#[derive(Args, Debug, Clone)]
pub struct IssueArgs {
    /// Identifier of the reporting snapshotter instance.
    #[arg(long, default_value = "snapshotter-notify")]
    pub instance_id: String,

    /// Category of the issue, e.g. `MISSED_SNAPSHOT`.
    #[arg(long)]
    pub issue_type: String,

    #[arg(long, default_value = "")]
    pub project_id: String,

    #[arg(long, default_value = "")]
    pub epoch_id: String,

    /// Free-form details attached to the report.
    #[arg(long)]
    pub extra: Option<String>,

    /// Send inline instead of through the async pipeline.
    #[arg(long)]
    pub blocking: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// Message kind: `epoch_processing` or `snapshot`.
    #[arg(long)]
    pub kind: String,

    /// JSON payload of the message.
    #[arg(long, value_name = "JSON")]
    pub payload: String,

    /// Send inline instead of through the async pipeline.
    #[arg(long)]
    pub blocking: bool,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        // Only an explicit `--trace` overrides; its absence keeps the file value.
        if self.trace {
            let mut logs = Dict::new();
            logs.insert("trace_enabled".into(), Value::from(true));
            dict.insert("logs".into(), Value::Dict(Tag::Default, logs));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
