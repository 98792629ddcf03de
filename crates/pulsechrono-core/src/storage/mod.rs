mod config;

pub use config::{AudioConfig, Config, CountdownConfig, StopwatchConfig, VoiceConfig};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/pulsechrono[-dev]/` based on PULSECHRONO_ENV.
///
/// Set PULSECHRONO_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(".config");

    let env = std::env::var("PULSECHRONO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pulsechrono-dev")
    } else {
        base_dir.join("pulsechrono")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
