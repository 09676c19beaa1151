use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// State remembered between runs.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateConfig {
    /// Scenario file used by the last run.
    #[serde(default)]
    pub last_scenario: Option<PathBuf>,
}
