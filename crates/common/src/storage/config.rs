//! Pool sizing and per-connection settings for the SQLite store

use std::path::PathBuf;
use std::time::Duration;

use super::error::{StorageError, StorageResult};

pub const MAX_POOL_SIZE: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub pool_size: u32,
    /// How long a checkout may wait for a free connection.
    pub checkout_timeout: Duration,
    /// How long SQLite itself waits on a locked database before `SQLITE_BUSY`.
    pub busy_timeout: Duration,
}

impl StorageConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool_size: 4,
            checkout_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// # Errors
    /// [`StorageError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> StorageResult<()> {
        let problem = if self.path.as_os_str().is_empty() {
            "database path is empty".to_string()
        } else if !(1..=MAX_POOL_SIZE).contains(&self.pool_size) {
            format!("pool_size must be between 1 and {MAX_POOL_SIZE}, got {}", self.pool_size)
        } else if self.checkout_timeout.is_zero() {
            "checkout_timeout must be positive".to_string()
        } else {
            return Ok(());
        };

        Err(StorageError::InvalidConfig(problem))
    }
}
