mod config;
pub mod database;
mod memory;

pub use config::{Config, LimitsConfig, NotificationsConfig, Theme};
pub use database::SqliteStorage;
pub use memory::MemoryStorage;

use std::path::PathBuf;

use crate::error::StorageError;

/// Keys for each independently stored entity.
pub mod keys {
    pub const HABITS: &str = "microhabit_habits_v2";
    pub const HABIT_PROGRESS: &str = "microhabit_progress_v2";
    pub const LAST_DATE: &str = "microhabit_last_date";
    pub const APP_VERSION: &str = "microhabit_version";
    pub const WEEKLY_INSIGHT: &str = "microhabit_weekly_insight";
    /// RFC 3339 time the weekly insight was generated.
    pub const LAST_INSIGHT: &str = "microhabit_last_insight";

    /// Every key owned by the current format.
    pub const ALL: [&str; 6] = [
        HABITS,
        HABIT_PROGRESS,
        LAST_DATE,
        APP_VERSION,
        WEEKLY_INSIGHT,
        LAST_INSIGHT,
    ];
}

/// A named-blob store. No transactions: each key is written on its own and a
/// caller must not assume writes to several keys land together.
pub trait Persistence {
    /// Read a blob; `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;

    fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<P: Persistence + ?Sized> Persistence for &P {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Returns the data directory.
///
/// `MICROHABIT_HOME` wins when set. Otherwise `~/.config/microhabit[-dev]/`,
/// where MICROHABIT_ENV=dev selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("MICROHABIT_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("MICROHABIT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("microhabit-dev")
            } else {
                base_dir.join("microhabit")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
