//! Bounded retry for transient "database is locked" failures

use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::Result;

/// Linear-backoff retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay before the attempt following `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Run `op` until it succeeds, fails with a non-lock error, or attempts run out.
    ///
    /// The sleep between attempts blocks the calling thread.
    pub fn run<T, F>(&self, op_name: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_locked() && attempt < max_attempts => {
                    warn!(
                        operation = op_name,
                        attempt,
                        max_attempts,
                        "database is locked, retrying"
                    );
                    thread::sleep(self.delay_after(attempt));
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn locked() -> StoreError {
        StoreError::Sqlite(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".to_string()),
        ))
    }

    fn fast() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    #[test]
    fn backoff_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
    }

    #[test]
    fn two_lock_errors_then_success_returns_value() {
        let mut calls = 0;
        let result = fast().run("test", || {
            calls += 1;
            if calls <= 2 {
                Err(locked())
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[test]
    fn three_lock_errors_surface_the_error() {
        let mut calls = 0;
        let result: Result<()> = fast().run("test", || {
            calls += 1;
            Err(locked())
        });
        assert!(result.unwrap_err().is_locked());
        assert_eq!(calls, 3);
    }

    #[test]
    fn other_errors_are_not_retried() {
        let mut calls = 0;
        let result: Result<()> = fast().run("test", || {
            calls += 1;
            Err(StoreError::config("boom"))
        });
        assert!(matches!(result, Err(StoreError::Config { .. })));
        assert_eq!(calls, 1);
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            base_delay: Duration::ZERO,
        };
        let mut calls = 0;
        let _ = policy.run("test", || -> Result<()> {
            calls += 1;
            Err(locked())
        });
        assert_eq!(calls, 1);
    }
}
