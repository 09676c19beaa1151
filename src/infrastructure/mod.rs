//! Infrastructure layer: configuration and scenario files.

/// Application configuration.
pub mod config;
/// Scenario file loading.
pub mod scenario_loader;

pub use config::{AppConfig, CliArgs, Command, LogLevel, StorageManager};
pub use scenario_loader::{ScenarioError, ScenarioLoader};
