use super::app_config::LogLevel;
use crate::domain::entities::TimeId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "histitem",
    version,
    about = "Classify message payloads and evaluate message rules",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Allow deleting incoming private messages for both sides.
    #[arg(long, global = true)]
    pub revoke_private_inbox: Option<bool>,

    /// Count pinned-message notices as mentions.
    #[arg(long, global = true)]
    pub notify_about_pinned: Option<bool>,

    /// Seconds during which sent messages stay editable.
    #[arg(long, value_name = "SECONDS", global = true)]
    pub edit_time_limit: Option<TimeId>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one report line per message of a scenario.
    Inspect {
        /// Scenario file; the last inspected one when omitted.
        #[arg(value_name = "SCENARIO")]
        scenario: Option<PathBuf>,

        /// Unix time used for age limits.
        #[arg(long, value_name = "UNIX")]
        now: Option<TimeId>,

        /// Leave sender names out of chat-list previews.
        #[arg(long)]
        without_sender: bool,
    },
    /// Feed the scenario's send outcomes through the send pipeline.
    Replay {
        /// Scenario file; the last inspected one when omitted.
        #[arg(value_name = "SCENARIO")]
        scenario: Option<PathBuf>,
    },
}

impl Command {
    /// Scenario path given on the command line.
    #[must_use]
    pub const fn scenario(&self) -> Option<&PathBuf> {
        match self {
            Self::Inspect { scenario, .. } | Self::Replay { scenario } => scenario.as_ref(),
        }
    }
}
