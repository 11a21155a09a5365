//! Persisted user configuration

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{RuntimeError, RuntimeResult};

/// User toggles, persisted between runs
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    /// Compensation active
    pub enabled: bool,
    /// Log every compensation, not just the first of a session
    pub enable_logging: bool,
    /// Compute overrides without applying them
    pub enable_dry_run: bool,
}

/// JSON file backing a `Configuration`
#[derive(Clone, Debug)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration; a missing file yields the defaults
    pub fn load(&self) -> RuntimeResult<Configuration> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no config file, using defaults");
                return Ok(Configuration::default());
            }
            Err(source) => {
                return Err(RuntimeError::ConfigIo {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|source| RuntimeError::ConfigFormat {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, config: &Configuration) -> RuntimeResult<()> {
        let text = serde_json::to_string_pretty(config).map_err(|source| {
            RuntimeError::ConfigFormat {
                path: self.path.clone(),
                source,
            }
        })?;

        fs::write(&self.path, text).map_err(|source| RuntimeError::ConfigIo {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let file = ConfigFile::new(dir.path().join("noclip.json"));

        assert_eq!(file.load().unwrap(), Configuration::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = ConfigFile::new(dir.path().join("noclip.json"));
        let config = Configuration {
            enabled: true,
            enable_logging: false,
            enable_dry_run: true,
        };

        file.save(&config).unwrap();

        assert_eq!(file.load().unwrap(), config);
        let raw = fs::read_to_string(file.path()).unwrap();
        assert!(raw.contains("\"enableDryRun\": true"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noclip.json");
        fs::write(&path, r#"{ "enabled": true }"#).unwrap();

        let config = ConfigFile::new(&path).load().unwrap();
        assert!(config.enabled);
        assert!(!config.enable_logging);
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noclip.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            ConfigFile::new(&path).load(),
            Err(RuntimeError::ConfigFormat { .. })
        ));
    }
}
