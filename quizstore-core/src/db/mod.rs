//! SQLite repository for quiz content, sessions and the university catalog
//!
//! One connection behind one mutex: every operation holds the lock for its
//! whole body, so calls are strictly sequential no matter how many threads
//! share a [`Database`]. Mutations run inside a transaction that rolls back
//! when dropped uncommitted.

mod questions;
mod seed;
mod sessions;
mod specializations;
mod stats;
mod universities;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::retry::RetryPolicy;

/// Options applied when opening a database file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    pub busy_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

/// Thread-safe repository handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
    retry: RetryPolicy,
}

impl Database {
    /// Open or create the database at the given path with default options
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(path, OpenOptions::default())
    }

    /// Open or create the database at the given path
    pub fn open_with(path: impl Into<PathBuf>, options: OpenOptions) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        conn.busy_timeout(options.busy_timeout)?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
            retry: options.retry,
        };

        db.run_migrations()?;
        Ok(db)
    }

    /// Open the database described by a loaded config
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Self::open_with(
            config.database.path.clone(),
            OpenOptions {
                busy_timeout: config.busy_timeout(),
                retry: config.retry_policy(),
            },
        )
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
            retry: RetryPolicy::default(),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Create the five tables and their indexes if absent
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA)?;
        conn.execute_batch(INDEXES)?;
        debug!(path = %self.path.display(), "schema ready");
        Ok(())
    }

    /// Acquire the process-wide lock for one unit of work
    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    pub(crate) fn with_retry<T, F>(&self, op_name: &str, op: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        self.retry.run(op_name, op)
    }
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY,
    text TEXT NOT NULL,
    options TEXT NOT NULL,
    category VARCHAR(50) NOT NULL DEFAULT '',
    created_at TEXT
);

CREATE TABLE IF NOT EXISTS specializations (
    id INTEGER PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    description TEXT,
    tech_score REAL,
    analytic_score REAL,
    creative_score REAL,
    careers TEXT,
    skills TEXT
);

CREATE TABLE IF NOT EXISTS universities (
    id INTEGER PRIMARY KEY,
    name VARCHAR(150) NOT NULL,
    specialization_id INTEGER,
    score_min REAL,
    score_max REAL,
    location VARCHAR(50),
    url VARCHAR(200)
);

CREATE TABLE IF NOT EXISTS user_sessions (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL,
    session_id TEXT NOT NULL,
    current_question INTEGER NOT NULL DEFAULT 1,
    answers TEXT NOT NULL DEFAULT '{}',
    is_completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT
);

CREATE TABLE IF NOT EXISTS user_answers (
    id INTEGER PRIMARY KEY,
    user_id INTEGER,
    question_id INTEGER,
    answer_value INTEGER,
    session_id TEXT,
    created_at TEXT
);
"#;

const INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_specializations_name ON specializations(name);
CREATE INDEX IF NOT EXISTS idx_universities_spec ON universities(specialization_id);
CREATE INDEX IF NOT EXISTS idx_universities_name ON universities(name);
CREATE INDEX IF NOT EXISTS idx_sessions_active ON user_sessions(user_id, is_completed);
"#;

// ============================================================================
// Helpers
// ============================================================================

fn parse_datetime(s: Option<String>) -> DateTime<Utc> {
    s.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_file_and_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quiz.db");

        let db = Database::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), path.as_path());
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.db");

        let db = Database::open(&path).unwrap();
        db.seed_from_fallback().unwrap();
        drop(db);

        let db = Database::open(&path).unwrap();
        assert_eq!(db.get_all_questions().unwrap().len(), 30);
    }

    #[test]
    fn test_from_config_uses_retry_settings() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::from_toml(&format!(
            "[database]\npath = {:?}\n\n[retry]\nmax_attempts = 5\nbase_delay_ms = 7\n",
            dir.path().join("cfg.db")
        ))
        .unwrap();

        let db = Database::from_config(&config).unwrap();
        assert_eq!(db.retry_policy().max_attempts, 5);
        assert_eq!(db.retry_policy().base_delay, Duration::from_millis(7));
    }

    #[test]
    fn test_parse_datetime_round_trip() {
        let now = Utc::now();
        let parsed = parse_datetime(Some(format_datetime(now)));
        assert_eq!(parsed, now);
    }
}
