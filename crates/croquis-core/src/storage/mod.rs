mod config;

pub use config::{Config, SessionConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the config directory, creating it if needed.
///
/// `CROQUIS_CONFIG_DIR` overrides the location outright. Otherwise it is
/// `~/.config/croquis/`, or `~/.config/croquis-dev/` when `CROQUIS_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("CROQUIS_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CROQUIS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("croquis-dev")
            } else {
                base_dir.join("croquis")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DirUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
