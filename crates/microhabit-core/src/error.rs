//! Core error types for microhabit-core.
//!
//! This module defines the error hierarchy using thiserror. Store errors
//! (`NotFound`, `DuplicateId`, `InvalidFormat`) are always raised before any
//! state is touched, so a caller can surface them and keep going.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for microhabit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An operation referenced a habit id that does not exist
    #[error("Habit not found: {habit_id}")]
    NotFound { habit_id: String },

    /// A habit with this id already exists
    #[error("Habit already exists: {habit_id}")]
    DuplicateId { habit_id: String },

    /// An import payload failed structural validation
    #[error("Invalid snapshot format: {0}")]
    InvalidFormat(String),

    /// Persistence provider errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub fn not_found(habit_id: impl Into<String>) -> Self {
        CoreError::NotFound {
            habit_id: habit_id.into(),
        }
    }

    pub fn duplicate_id(habit_id: impl Into<String>) -> Self {
        CoreError::DuplicateId {
            habit_id: habit_id.into(),
        }
    }
}

/// Persistence-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open storage at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Storage is locked by another writer
    #[error("Storage is locked")]
    Locked,

    /// A stored blob could not be decoded
    #[error("Stored value for '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },

    /// The provider refused the write (quota, read-only, etc.)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors for user-supplied habit data.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Name too short or too long
    #[error("Habit name must be between {min} and {max} characters (got {len})")]
    NameLength { len: usize, min: usize, max: usize },

    /// Description too long
    #[error("Description must be at most {max} characters (got {len})")]
    DescriptionLength { len: usize, max: usize },

    /// Too many habits
    #[error("Cannot track more than {max} habits")]
    TooManyHabits { max: usize },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked
                    || code.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
