//! Application configuration
//! Loaded once at startup from a JSON file; every field falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "DATASET_VISUALIZER_CONFIG";

const CONFIG_FILE_NAME: &str = ".dataset_visualizer.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window_width: f32,
    pub window_height: f32,
    /// Rows shown in the dataset preview table.
    pub preview_rows: usize,
    /// Rows scanned when inferring the CSV schema.
    pub infer_schema_rows: usize,
    pub export_width: u32,
    pub export_height: u32,
    pub open_after_export: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 1400.0,
            window_height: 800.0,
            preview_rows: 5,
            infer_schema_rows: 10000,
            export_width: 1200,
            export_height: 800,
            open_after_export: true,
        }
    }
}

impl Config {
    /// Resolve the config location: env override first, then the home directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        #[allow(deprecated)]
        std::env::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Read a config file. A missing file is not an error and yields defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Load from the default location, logging and falling back to defaults on error.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("could not determine home directory to load config file");
            return Self::default();
        };
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "preview_rows": 12, "open_after_export": false }}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.preview_rows, 12);
        assert!(!config.open_after_export);
        assert_eq!(config.export_width, Config::default().export_width);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "preview_rows = 3").unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
