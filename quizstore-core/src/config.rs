use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::retry::RetryPolicy;

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "QUIZSTORE_CONFIG";
/// Environment variable overriding `database.path`
pub const DB_ENV: &str = "QUIZSTORE_DB";
/// Environment variable overriding the directory of both website files
pub const SITE_DIR_ENV: &str = "QUIZSTORE_SITE_DIR";

/// Centralized configuration for the quiz store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database: DatabaseConfig,
    pub retry: RetryConfig,
    pub website: SiteConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    /// Engine-level busy timeout, applied before our own retry kicks in
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("quiz.db"),
            busy_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
        }
    }
}

/// Locations of the files regenerated by website sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub json_path: PathBuf,
    pub html_path: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            json_path: PathBuf::from("universities.json"),
            html_path: PathBuf::from("universities.html"),
        }
    }
}

impl SiteConfig {
    /// Both files under one directory (for testing and `QUIZSTORE_SITE_DIR`)
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            json_path: dir.join("universities.json"),
            html_path: dir.join("universities.html"),
        }
    }
}

impl StoreConfig {
    /// Load config, resolving the file location.
    ///
    /// An explicit path (argument or `QUIZSTORE_CONFIG`) must exist; the
    /// default `~/.quizstore/config.toml` may be absent, in which case
    /// defaults apply. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(StoreError::ConfigNotFound { path });
                }
                Self::from_file(&path)?
            }
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| StoreError::config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Default config file path: ~/.quizstore/config.toml
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".quizstore/config.toml")
    }

    fn apply_env_overrides(&mut self) {
        if let Some(db) = env::var_os(DB_ENV) {
            self.database.path = PathBuf::from(db);
        }
        if let Some(dir) = env::var_os(SITE_DIR_ENV) {
            self.website = SiteConfig::in_dir(PathBuf::from(dir));
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.base_delay_ms),
        )
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.database.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = StoreConfig::from_toml("").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.busy_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = StoreConfig::from_toml(
            r#"
            [database]
            path = "/var/lib/quiz/quiz.db"

            [retry]
            base_delay_ms = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.database.path, PathBuf::from("/var/lib/quiz/quiz.db"));
        assert_eq!(config.database.busy_timeout_ms, 30_000);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry_policy().base_delay, Duration::from_millis(5));
        assert_eq!(config.website, SiteConfig::default());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = StoreConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, StoreError::ConfigNotFound { .. }));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[database\npath = 1").unwrap();
        let err = StoreConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn site_paths_in_dir() {
        let site = SiteConfig::in_dir("/srv/site");
        assert_eq!(site.json_path, PathBuf::from("/srv/site/universities.json"));
        assert_eq!(site.html_path, PathBuf::from("/srv/site/universities.html"));
    }
}
