//! Core error types for croquis-core.
//!
//! Every condition in the session core is recoverable: starting with no items,
//! rejecting a custom duration, or failing to load the persisted config.
//! Stale ticks are not errors at all and never surface here.

use std::path::PathBuf;
use thiserror::Error;

use crate::duration::{MAX_CUSTOM_SECONDS, MIN_CUSTOM_SECONDS};

/// Core error type for croquis-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session lifecycle errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Custom duration entry errors
    #[error("Duration error: {0}")]
    Duration(#[from] DurationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while starting or driving a session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A session needs at least one valid item.
    #[error("cannot start a session without any images")]
    EmptyInput,
}

/// Errors raised while parsing a custom `mm:ss` duration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("expected time in mm:ss format (e.g. 4:30), got '{0}'")]
    InvalidFormat(String),

    #[error("{seconds}s is below the minimum of {min}s", min = MIN_CUSTOM_SECONDS)]
    BelowMinimum { seconds: u32 },

    #[error("{seconds}s is above the maximum of {max}s", max = MAX_CUSTOM_SECONDS)]
    AboveMaximum { seconds: u32 },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Config directory could not be determined or created
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
