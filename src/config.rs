//! Configuration loading.
//!
//! Precedence: explicit `--config` path, then `MASTERY_ROOT` /
//! `MASTERY_OWNER` environment overrides, then the config file at
//! `~/.config/mastery/config.toml`, then built-in defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{MasteryError, Result};

/// Runtime configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Data directory holding the database.
    pub root: PathBuf,
    /// Profile the skill graph belongs to.
    pub owner: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            owner: "default".to_string(),
        }
    }
}

impl Config {
    /// Load configuration, applying environment overrides on top of the
    /// file (if any).
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(root) = std::env::var("MASTERY_ROOT") {
            config.root = PathBuf::from(root);
        }
        if let Ok(owner) = std::env::var("MASTERY_OWNER") {
            config.owner = owner;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            MasteryError::Config(format!("cannot read {}: {err}", path.display()))
        })?;
        toml::from_str(&raw)
            .map_err(|err| MasteryError::Config(format!("invalid {}: {err}", path.display())))
    }

    /// Path of the SQLite database.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.root.join("mastery.db")
    }
}

fn default_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mastery")
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mastery")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.owner, "default");
        assert!(config.db_path().ends_with("mastery.db"));
    }

    #[test]
    fn file_values_are_honored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "root = \"/tmp/mastery-test\"\nowner = \"ana\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.owner, "ana");
        assert_eq!(config.root, PathBuf::from("/tmp/mastery-test"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "nonsense = true\n").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(MasteryError::Config(_))
        ));
    }
}
