//! Configuration management for datastation
//!
//! Settings come from an optional TOML file; every field has a default so a
//! missing file is not an error when the default location is used.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backing store settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Spreadsheet import settings
    #[serde(default)]
    pub import: ImportConfig,
}

/// Backing store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file, created on first use
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

/// Spreadsheet import configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Workbook loaded when `--filename` is not given
    #[serde(default = "default_import_file")]
    pub default_file: PathBuf,

    /// First data row of the sheet (1-based)
    #[serde(default = "default_first_data_row")]
    pub first_data_row: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_file: default_import_file(),
            first_data_row: default_first_data_row(),
        }
    }
}

impl Config {
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".datastation")
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Load configuration from an explicit file; the file must exist
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        let content = std::fs::read_to_string(config_path).map_err(|e| {
            Error::Config(format!("Cannot read {}: {}", config_path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the given file, or from the default location if it exists
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load(path);
        }

        let default_path = Self::default_config_path();
        if default_path.exists() {
            Self::load(&default_path)
        } else {
            debug!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(Error::Config("database.path must not be empty".to_string()));
        }

        if self.import.first_data_row == 0 {
            return Err(Error::Config(
                "import.first_data_row is 1-based and must be >= 1".to_string(),
            ));
        }

        Ok(())
    }
}
