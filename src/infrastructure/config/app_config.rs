//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;
use crate::domain::entities::HistorySettings;

pub(crate) const APP_NAME: &str = "histitem";
pub(crate) const APP_QUALIFIER: &str = "org";
pub(crate) const APP_ORGANIZATION: &str = "histitem";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    Info,
    /// Warning level.
    #[default]
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Application configuration, from `config.toml` merged with CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Limits threaded into message rules.
    #[serde(default)]
    pub history: HistorySettings,

    /// Report output settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Report output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Timestamp format string (chrono format).
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Leave the sender name out of chat-list previews.
    #[serde(default)]
    pub without_sender: bool,
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timestamp_format: default_timestamp_format(),
            without_sender: false,
        }
    }
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(revoke_private_inbox) = args.revoke_private_inbox {
            self.history.revoke_private_inbox = revoke_private_inbox;
        }
        if let Some(notify_about_pinned) = args.notify_about_pinned {
            self.history.notify_about_pinned = notify_about_pinned;
        }
        if let Some(edit_time_limit) = args.edit_time_limit {
            self.history.edit_time_limit = edit_time_limit;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::default(),
            history: HistorySettings::default(),
            report: ReportConfig::default(),
        }
    }
}
