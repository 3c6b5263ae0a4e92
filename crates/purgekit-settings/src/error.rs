//! Error types for the settings crate.

use std::io;
use thiserror::Error;

/// Errors that can occur while loading relocation settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file extension is not recognized.
    #[error("Settings file must be .json or .toml: {0}")]
    UnsupportedFormat(String),

    /// A loaded or overridden value failed validation.
    #[error("Invalid settings: {0}")]
    Invalid(#[from] purgekit_core::ConfigError),

    /// I/O error while reading the settings file.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
