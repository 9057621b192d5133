/// Structured error types for quizstore-core.
///
/// Uses `thiserror` so the bot front-end can match on failure classes.
/// The `quizstore` binary wraps these in `anyhow` at command boundaries.
use std::io;
use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Main error type for repository operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite engine failure (including transient busy/locked conditions)
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Structured text column could not be encoded or decoded
    #[error("JSON error in {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// I/O operation failed (website export files, config)
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Configuration file missing or malformed
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// Explicit config path that does not exist
    #[error("Config not found at {path:?}")]
    ConfigNotFound { path: PathBuf },

    /// A previous holder of the connection lock panicked
    #[error("Database lock poisoned")]
    Poisoned,

    /// Row content violates an expected shape
    #[error("Invalid {entity} record {id}: {reason}")]
    InvalidRecord {
        entity: &'static str,
        id: i64,
        reason: String,
    },
}

/// Result type alias for quizstore-core operations
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create an invalid record error
    pub fn invalid_record(entity: &'static str, id: i64, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            entity,
            id,
            reason: reason.into(),
        }
    }

    /// True when the engine reported transient contention ("database is locked").
    ///
    /// Only these failures are eligible for retry.
    pub fn is_locked(&self) -> bool {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}
