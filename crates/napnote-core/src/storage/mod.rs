mod config;
mod session_log;

pub use config::{ChildConfig, ClockConfig, Config, InsightsConfig, MAX_LOOKBACK_DAYS};
pub use session_log::{load_snapshot, SessionLog};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/napnote[-dev]/` based on NAPNOTE_ENV.
///
/// Set NAPNOTE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("NAPNOTE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("napnote-dev")
    } else {
        base_dir.join("napnote")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
