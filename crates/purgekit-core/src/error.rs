//! Error types for the relocation engine.
//!
//! This module provides structured error types for configuration
//! validation and stream processing.

use std::io;
use thiserror::Error;

/// Errors that can occur while post-processing a G-code stream.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// A required configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error while reading the input or writing the output stream.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Errors related to relocation configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration value is missing.
    #[error("Missing required setting: {0}")]
    Missing(String),

    /// A configuration value is out of the valid range.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Result type alias for stream processing.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Result type alias for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;
