//! Configuration persistence utilities
//!
//! Provides functions for loading and saving preference files to disk.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error while reading/writing config
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Get the base configuration directory shared by all apps in the series
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "clock-series", "clocks")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the configuration file path for a specific app
pub fn config_path(app_name: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(format!("{}.toml", app_name)))
}

/// Load configuration for a specific app
///
/// Returns `None` if the config file doesn't exist yet.
/// Returns an error if the file exists but can't be parsed.
pub fn load_config<T: DeserializeOwned>(app_name: &str) -> Result<Option<T>, ConfigError> {
    let path = config_path(app_name).ok_or(ConfigError::NoConfigDir)?;
    load_config_from(&path)
}

/// Load configuration from an explicit path
pub fn load_config_from<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let config: T = toml::from_str(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(Some(config))
}

/// Save configuration for a specific app
pub fn save_config<T: Serialize>(app_name: &str, config: &T) -> Result<(), ConfigError> {
    let path = config_path(app_name).ok_or(ConfigError::NoConfigDir)?;
    save_config_to(&path, config)
}

/// Save configuration to an explicit path, creating parent directories
pub fn save_config_to<T: Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    tracing::debug!(path = %path.display(), "saved config");
    Ok(())
}

/// Delete configuration for a specific app
pub fn delete_config(app_name: &str) -> Result<(), ConfigError> {
    let path = config_path(app_name).ok_or(ConfigError::NoConfigDir)?;
    delete_config_at(&path)
}

/// Delete a configuration file; a missing file is not an error
pub fn delete_config_at(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        fs::remove_file(path)?;
        tracing::debug!(path = %path.display(), "deleted config");
    }
    Ok(())
}
