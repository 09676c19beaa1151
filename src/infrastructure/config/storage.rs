use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};
use super::state_config::StateConfig;
use directories::ProjectDirs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";
const STATE_FILE_NAME: &str = "state.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no platform config directory for {APP_NAME}")]
    ConfigDirNotFound,
    #[error("config storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode settings as toml: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("cannot decode toml settings: {0}")]
    TomlDe(#[from] toml::de::Error),
}

/// Owns the directory holding `config.toml` and `state.toml`.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Uses the platform config directory for histitem.
    ///
    /// # Errors
    ///
    /// Fails with `ConfigDirNotFound` when the platform has no home directory.
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .ok_or(ConfigError::ConfigDirNotFound)?;
        Ok(Self::with_dir(dirs.config_dir().to_path_buf()))
    }

    #[must_use]
    pub const fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// # Errors
    ///
    /// Fails when the directory cannot be created.
    pub fn ensure_config_dir(&self) -> Result<(), ConfigError> {
        if self.config_dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.config_dir)?;
        info!(path = %self.config_dir.display(), "Config directory created");
        Ok(())
    }

    /// Reads the settings file, seeding it with defaults on first run.
    ///
    /// A file that does not parse is kept as is and the defaults are used.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors reading the file or seeding the defaults.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        self.ensure_config_dir()?;
        let path = path_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config_dir.join(CONFIG_FILE_NAME));

        let Some(mut config) = read_toml::<AppConfig>(&path)? else {
            info!(path = %path.display(), "Seeding default settings");
            let defaults = AppConfig::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            write_atomically(&path, &defaults)?;
            return Ok(defaults);
        };
        config.config = Some(path);
        Ok(config)
    }

    /// Reads what the previous run remembered; empty when nothing was saved.
    ///
    /// # Errors
    ///
    /// Fails when the state file exists but cannot be read.
    pub fn load_state(&self) -> Result<StateConfig, ConfigError> {
        self.ensure_config_dir()?;
        Ok(read_toml(&self.config_dir.join(STATE_FILE_NAME))?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Fails when the state file cannot be written.
    pub fn save_state(&self, state: &StateConfig) -> Result<(), ConfigError> {
        self.ensure_config_dir()?;
        let path = self.config_dir.join(STATE_FILE_NAME);
        write_atomically(&path, state)?;
        debug!(path = %path.display(), "State saved");
        Ok(())
    }
}

/// `None` when the file is absent; defaults when it does not parse.
fn read_toml<T: DeserializeOwned + Default>(path: &Path) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    let value = toml::from_str(&text).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Unreadable toml, falling back to defaults");
        T::default()
    });
    Ok(Some(value))
}

/// Stages the encoded value next to `path` and renames it into place.
fn write_atomically<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let encoded = toml::to_string_pretty(value)?;
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(encoded.as_bytes())?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_config_dir_creates_directory() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("histitem");
        let manager = StorageManager::with_dir(config_path.clone());

        assert!(!config_path.exists());
        manager.ensure_config_dir().unwrap();
        assert!(config_path.exists());
    }

    #[test]
    fn test_load_config_creates_default_if_missing() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());

        let config = manager.load_config(None).unwrap();
        assert!(config.history.notify_about_pinned);

        let config_file = dir.path().join(CONFIG_FILE_NAME);
        assert!(config_file.exists());

        let written = fs::read_to_string(&config_file).unwrap();
        assert!(written.contains("[history]"));
    }

    #[test]
    fn test_load_config_reads_history_limits() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        let config_file = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_file, "[history]\nedit_time_limit = 60\n").unwrap();

        let config = manager.load_config(None).unwrap();
        assert_eq!(config.history.edit_time_limit, 60);
        assert_eq!(config.config, Some(config_file));
    }

    #[test]
    fn test_load_config_handles_malformed_file() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        let config_file = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_file, "invalid_toml = [").unwrap();

        let config = manager.load_config(None).unwrap();
        assert_eq!(config.history, crate::domain::HistorySettings::default());
        let content = fs::read_to_string(&config_file).unwrap();
        assert_eq!(content, "invalid_toml = [");
    }

    #[test]
    fn test_save_and_load_state() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());

        let state = StateConfig {
            last_scenario: Some(PathBuf::from("/tmp/channel.json")),
        };
        manager.save_state(&state).unwrap();

        let loaded_state = manager.load_state().unwrap();
        assert_eq!(loaded_state, state);
        assert!(dir.path().join(STATE_FILE_NAME).exists());
    }

    #[test]
    fn test_malformed_state_resets() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        fs::write(dir.path().join(STATE_FILE_NAME), "last_scenario = 5").unwrap();

        assert_eq!(manager.load_state().unwrap(), StateConfig::default());
    }

    #[test]
    fn test_save_state_replaces_previous_file() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        fs::write(dir.path().join(STATE_FILE_NAME), "stale = true\n").unwrap();

        let state = StateConfig {
            last_scenario: Some(PathBuf::from("replay.json")),
        };
        manager.save_state(&state).unwrap();

        let written = fs::read_to_string(dir.path().join(STATE_FILE_NAME)).unwrap();
        assert!(!written.contains("stale"));
        assert!(written.contains("replay.json"));
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
