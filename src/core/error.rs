//! Error types for the host application core
//!
//! Covers settings persistence and logging setup. Engine and position
//! errors come from their own crates and are wrapped by `anyhow` at the
//! binary boundary.

use thiserror::Error;

/// Errors that can occur while loading, validating or saving configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file I/O error
    #[error("Settings I/O error: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings serialization/deserialization error
    #[error("Settings serialization error: {0}")]
    SettingsSerialization(#[from] serde_json::Error),

    /// Settings parsed but hold values the analyzer cannot use
    #[error("Invalid setting `{field}`: {message}")]
    InvalidValue { field: &'static str, message: String },

    /// Global subscriber already installed or filter rejected
    #[error("Logging initialization failed: {message}")]
    Logging { message: String },
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
