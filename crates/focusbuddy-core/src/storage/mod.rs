mod config;
pub mod database;
pub mod keys;
pub mod kv;

pub use config::{AppConfig, LoggingConfig, NotificationsConfig, PolicyConfig, StorageBackend, StorageConfig};
pub use database::SqliteStore;
pub use kv::{KvStore, MemoryStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `FOCUSBUDDY_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/focusbuddy[-dev]/`, with `FOCUSBUDDY_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("FOCUSBUDDY_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FOCUSBUDDY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusbuddy-dev")
            } else {
                base_dir.join("focusbuddy")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
