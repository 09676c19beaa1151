use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::application::dto::ScenarioDto;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scenario {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads scenario files from disk.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Loads and parses a JSON scenario file.
    ///
    /// # Errors
    ///
    /// Returns `ScenarioError` if the file cannot be read or does not parse.
    pub async fn load(path: &Path) -> Result<ScenarioDto, ScenarioError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| ScenarioError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let scenario: ScenarioDto =
            serde_json::from_str(&content).map_err(|source| ScenarioError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            path = %path.display(),
            peer = %scenario.peer.id(),
            messages = scenario.messages.len(),
            local_echoes = scenario.local_echoes.len(),
            "Scenario loaded"
        );
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO: &str = r#"{
        "peer": {"id": 7, "name": "Alice", "kind": {"type": "user"}},
        "messages": [
            {"_": "message", "id": 10, "date": 1700000000, "message": "hi", "from_id": 7},
            {"_": "messageEmpty", "id": 11}
        ]
    }"#;

    #[tokio::test]
    async fn test_load_scenario() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SCENARIO.as_bytes()).unwrap();

        let scenario = ScenarioLoader::load(file.path()).await.unwrap();
        assert_eq!(scenario.messages.len(), 2);
        assert!(scenario.local_echoes.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScenarioLoader::load(&dir.path().join("missing.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScenarioError::Io { .. }));
    }

    #[tokio::test]
    async fn test_malformed_file_is_json_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"peer\": ").unwrap();

        let err = ScenarioLoader::load(file.path()).await.unwrap_err();
        assert!(matches!(err, ScenarioError::Json { .. }));
        assert!(err.to_string().starts_with("malformed scenario"));
    }
}
