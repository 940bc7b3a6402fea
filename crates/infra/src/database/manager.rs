//! Database connection manager backed by the shared SQLite pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quickstart_common::storage::{
    HealthStatus, SqliteConnection, SqlitePool, StorageConfig, StorageError, Transaction,
};
use quickstart_domain::{QuickStartError, Result};
use tracing::{debug, info};

use crate::errors::{log_storage_failure, InfraError};

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Database manager that wraps an [`SqlitePool`].
pub struct DbManager {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl DbManager {
    /// Open (or create) the database at `db_path` with the given pool size.
    ///
    /// The parent directory is created if missing.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                QuickStartError::Database(format!(
                    "failed to create database directory {}: {err}",
                    parent.display()
                ))
            })?;
        }

        let storage = StorageConfig::new(path.clone()).with_pool_size(pool_size.max(1));
        let pool = SqlitePool::open(&storage).map_err(|err| map_storage_error("db.open", err))?;

        info!(
            db_path = %path.display(),
            max_connections = pool.max_size(),
            "sqlite pool initialised"
        );

        Ok(Self { pool: Arc::new(pool), path })
    }

    /// Acquire a SQLite connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        self.pool.get_connection().map_err(|err| map_storage_error("db.checkout", err))
    }

    /// Run `f` in a transaction on a pooled connection.
    ///
    /// Commits on `Ok`, rolls back on `Err`; the connection returns to the
    /// pool on every path.
    pub fn with_transaction<T, F>(&self, operation: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> std::result::Result<T, InfraError>,
    {
        let mut conn = self.get_connection()?;
        conn.with_transaction(f).map_err(|err| {
            debug!(operation, error = %err.0, "transaction rolled back");
            QuickStartError::from(err)
        })
    }

    /// Ensure the full schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        create_schema(&conn)?;
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check the database with a trivial query on a pooled connection.
    ///
    /// An unhealthy pool is returned as [`QuickStartError::Database`].
    pub fn health_check(&self) -> Result<HealthStatus> {
        let status = self.pool.health_check();
        let (checkouts, timeouts) = self.pool.checkout_counts();
        debug!(
            healthy = status.healthy,
            open_connections = status.open_connections,
            checkouts,
            timeouts,
            "db.health_check"
        );
        if status.healthy {
            Ok(status)
        } else {
            Err(QuickStartError::Database(
                status.message.unwrap_or_else(|| "database health check failed".into()),
            ))
        }
    }
}

fn create_schema(conn: &SqliteConnection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, CAST(strftime('%s','now') AS INTEGER))",
        &[&SCHEMA_VERSION],
    )
    .map_err(|err| map_storage_error("db.schema_version", err))?;
    Ok(())
}

fn map_sql_error(err: rusqlite::Error) -> QuickStartError {
    QuickStartError::from(InfraError::from(err))
}

fn map_storage_error(operation: &'static str, err: StorageError) -> QuickStartError {
    log_storage_failure(operation, &err);
    QuickStartError::from(InfraError::from(err))
}
