//! r2d2 pool over a single SQLite file

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::{debug, instrument, warn};

use super::config::StorageConfig;
use super::connection::SqliteConnection;
use super::error::{StorageError, StorageResult};

/// Pragmas applied to every connection the pool opens. Cascading deletes of
/// files, processes and sessions rely on `foreign_keys`.
const CONNECTION_PRAGMAS: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA foreign_keys = ON;
";

/// Result of [`SqlitePool::health_check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub healthy: bool,
    pub open_connections: u32,
    pub idle_connections: u32,
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: StorageConfig,
    checkouts: AtomicU64,
    timeouts: AtomicU64,
}

impl SqlitePool {
    /// Open (or create) the database file and build the pool.
    ///
    /// One connection is opened eagerly so an unwritable location or a file
    /// that is not a database fails here instead of on first query.
    #[instrument(skip(config), fields(db_path = %config.path.display(), pool_size = config.pool_size))]
    pub fn open(config: &StorageConfig) -> StorageResult<Self> {
        config.validate()?;

        let busy_timeout = config.busy_timeout;
        let manager = SqliteConnectionManager::file(&config.path)
            .with_init(move |conn| prepare_connection(conn, busy_timeout));

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(config.checkout_timeout)
            .build(manager)
            .map_err(|err| {
                warn!(error = %err, "sqlite pool could not be built");
                StorageError::Pool(err.to_string())
            })?;

        Ok(Self {
            pool,
            config: config.clone(),
            checkouts: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
        })
    }

    pub fn max_size(&self) -> u32 {
        self.pool.max_size()
    }

    /// Connections handed out and checkouts that timed out, since open.
    pub fn checkout_counts(&self) -> (u64, u64) {
        (self.checkouts.load(Ordering::Relaxed), self.timeouts.load(Ordering::Relaxed))
    }

    pub fn get_connection(&self) -> StorageResult<SqliteConnection> {
        match self.pool.get() {
            Ok(conn) => {
                self.checkouts.fetch_add(1, Ordering::Relaxed);
                Ok(SqliteConnection::new(conn))
            }
            // r2d2 reports a timeout as a plain error carrying the last
            // connection failure, if any.
            Err(err) if err.to_string().contains("timed out") => {
                self.timeouts.fetch_add(1, Ordering::Relaxed);
                warn!(timeout = ?self.config.checkout_timeout, "no free sqlite connection");
                Err(StorageError::Timeout(self.config.checkout_timeout.as_secs()))
            }
            Err(err) => Err(StorageError::Pool(err.to_string())),
        }
    }

    /// Run a trivial query on a pooled connection. Never fails; problems are
    /// reported in the returned status.
    pub fn health_check(&self) -> HealthStatus {
        let state = self.pool.state();
        let result = self
            .get_connection()
            .and_then(|conn| conn.query_row("SELECT 1", &[], |row| row.get::<_, i64>(0)));

        let message = result.err().map(|err| err.to_string());
        debug!(healthy = message.is_none(), connections = state.connections, "sqlite health check");

        HealthStatus {
            healthy: message.is_none(),
            open_connections: state.connections,
            idle_connections: state.idle_connections,
            message,
        }
    }
}

fn prepare_connection(conn: &Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    conn.execute_batch(CONNECTION_PRAGMAS)
}
