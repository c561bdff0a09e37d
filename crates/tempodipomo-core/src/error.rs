//! Core error types for tempodipomo-core.
//!
//! Rejected configuration is the only failure the timer itself can produce.
//! The remaining variants cover the config file and the driver channel.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tempodipomo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The driver task has exited (after quit, or its runtime shut down).
    #[error("Timer has been stopped")]
    TimerStopped,
}

/// Configuration-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Durations outside the accepted bounds, or not numbers at all.
    #[error("Work: 5-120 min, Break: 1-60 min")]
    InvalidConfig { work_input: String, break_input: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

impl ConfigError {
    pub(crate) fn invalid(work: impl ToString, brk: impl ToString) -> Self {
        ConfigError::InvalidConfig {
            work_input: work.to_string(),
            break_input: brk.to_string(),
        }
    }

    /// True for rejected timer durations, the one error callers re-prompt on.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, ConfigError::InvalidConfig { .. })
    }
}

impl CoreError {
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, CoreError::Config(e) if e.is_invalid_config())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
