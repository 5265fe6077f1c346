//! Configuration file handling for ~/.landtiler/config.ini.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read or parse the config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Load configuration from the default path (~/.landtiler/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }
}

/// Get the path to the config directory (~/.landtiler).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".landtiler")
}

/// Get the path to the config file (~/.landtiler/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
