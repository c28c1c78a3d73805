//! Configuration loading for Bastion.
//! Reads bastion.toml from the current directory or the path in the BASTION_CONFIG env var.

use bastion_common::ScoringParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "BASTION_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "bastion.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub scoring: ScoringParams,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// JSON snapshot of the settlement-defense tables
    #[serde(default = "default_records_path")]
    pub records_path: PathBuf,
    /// Persisted weight record
    #[serde(default = "default_weights_path")]
    pub weights_path: PathBuf,
}

fn default_records_path() -> PathBuf { PathBuf::from("data/records.json") }
fn default_weights_path() -> PathBuf { PathBuf::from("data/weights.json") }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            records_path: default_records_path(),
            weights_path: default_weights_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// tracing EnvFilter directive; RUST_LOG takes precedence
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String { "bastion=info,warn".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_filter() }
    }
}

impl Config {
    /// Load from `$BASTION_CONFIG`, else `./bastion.toml`, else built-in defaults.
    ///
    /// An explicitly named file must exist; the implicit one may be absent.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_path(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
