//! Configuration management for crewroster.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::Field;
use crate::roster::{DEFAULT_CAPACITY, HARD_CAPACITY};
use crate::storage::{RosterStore, DEFAULT_EXTENSION};
use crate::view::DEFAULT_PAGE_SIZE;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "crewroster";

/// Subdirectory of the data directory holding roster files.
const ROSTERS_DIR_NAME: &str = "rosters";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CREWROSTER_`, sections split by `__`)
/// 2. TOML config file at `~/.config/crewroster/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Roster configuration.
    pub roster: RosterConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Console configuration.
    pub ui: UiConfig,
}

/// Roster-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Highest pilot id the roster hands out.
    pub capacity: u32,
    /// Rows per page when viewing the roster.
    pub page_size: usize,
    /// Optional fields this airline records for each pilot.
    /// Fields left out are removed from every new record.
    pub tracked_fields: Vec<Field>,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding saved rosters.
    /// Defaults to `~/.local/share/crewroster/rosters`
    pub data_dir: Option<PathBuf>,
    /// Extension of roster files, without the dot.
    pub extension: String,
}

/// Console-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Clear the terminal before each screen.
    pub clear_screen: bool,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            page_size: DEFAULT_PAGE_SIZE,
            tracked_fields: vec![Field::Position, Field::BaseMonth],
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Will be resolved to default at runtime
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { clear_screen: true }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CREWROSTER_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
            .join(ROSTERS_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if !(1..=HARD_CAPACITY).contains(&self.roster.capacity) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "capacity ({}) must be between 1 and {HARD_CAPACITY}",
                    self.roster.capacity
                ),
            });
        }

        if self.roster.page_size == 0 {
            return Err(Error::ConfigValidation {
                message: "page_size must be greater than 0".to_string(),
            });
        }

        if let Some(field) = self.roster.tracked_fields.iter().find(|f| f.is_mandatory()) {
            return Err(Error::ConfigValidation {
                message: format!("tracked_fields lists mandatory field {field}"),
            });
        }

        // Validates the extension
        self.roster_store()?;

        Ok(())
    }

    /// Get the roster data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Check whether the roster records an optional field.
    #[must_use]
    pub fn tracks(&self, field: Field) -> bool {
        field.is_mandatory() || self.roster.tracked_fields.contains(&field)
    }

    /// Build the roster store this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file extension is invalid.
    pub fn roster_store(&self) -> Result<RosterStore> {
        RosterStore::new(self.data_dir(), &self.storage.extension)
    }
}
