//! Core error types for pulsechrono-core.
//!
//! Timer transitions never fail: an intent that does not apply to the
//! current state is a no-op. The errors below cover the configuration
//! layer and the non-essential collaborators around the engines.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pulsechrono-core.
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

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
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

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be resolved
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Audio cue playback errors.
///
/// Never propagated into timing state; the shell logs and drops them.
#[derive(Error, Debug)]
pub enum CueError {
    /// No output device or the cue is disabled on this host
    #[error("Audio output unavailable: {0}")]
    Unavailable(String),

    /// Writing the cue failed
    #[error("Audio cue failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
