//! Where monkeylog keeps its files, and the connection defaults used for
//! users without a saved profile.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::services::ConnectionDefaults;

const CONFIG_FILE: &str = "config.json";
const SETTINGS_FILE: &str = "settings.db";
const DRAFT_FILE: &str = "draft.json";

/// Contents of `config.json`; every key is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub connection: ConnectionDefaults,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub defaults: ConnectionDefaults,
}

impl AppConfig {
    /// Resolve the data directory and read its config file, if any
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let file = read_config_file(&data_dir.join(CONFIG_FILE))?;
        tracing::debug!(data_dir = %data_dir.display(), "configuration loaded");

        Ok(Self {
            data_dir,
            defaults: file.connection,
        })
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    pub fn draft_path(&self) -> PathBuf {
        self.data_dir.join(DRAFT_FILE)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    Ok(home.join(".monkeylog"))
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_config_uses_builtin_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig::load(Some(temp_dir.path().to_path_buf())).unwrap();

        assert_eq!(config.defaults, ConnectionDefaults::default());
        assert_eq!(config.settings_path(), temp_dir.path().join("settings.db"));
        assert_eq!(config.draft_path(), temp_dir.path().join("draft.json"));
    }

    #[test]
    fn partial_config_overrides_only_given_keys() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join("config.json"),
            r#"{ "connection": { "host": "10.0.0.5", "user": "trainer1" } }"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(temp_dir.path().to_path_buf())).unwrap();

        assert_eq!(config.defaults.host, "10.0.0.5");
        assert_eq!(config.defaults.user, "trainer1");
        assert_eq!(config.defaults.port, 3306);
        assert_eq!(config.defaults.database, "smiledb");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("config.json"), "port = 1").unwrap();

        assert!(AppConfig::load(Some(temp_dir.path().to_path_buf())).is_err());
    }
}
