//! Pooled connection and scoped transaction wrappers
//!
//! Both take positional `&[&dyn ToSql]` parameters and report failures as
//! [`StorageError`], so repositories never touch `rusqlite::Error` directly.

use std::ops::Deref;

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, Row, ToSql};
use tracing::{debug, trace};

use super::error::{StorageError, StorageResult};

/// A connection checked out of [`SqlitePool`](super::SqlitePool). Returned to
/// the pool on drop.
pub struct SqliteConnection {
    inner: PooledConnection<SqliteConnectionManager>,
}

impl SqliteConnection {
    pub(crate) fn new(inner: PooledConnection<SqliteConnectionManager>) -> Self {
        Self { inner }
    }

    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> StorageResult<usize> {
        trace!(sql, "execute");
        Ok(self.inner.execute(sql, params)?)
    }

    pub fn query_row<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> StorageResult<T>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        trace!(sql, "query_row");
        Ok(self.inner.query_row(sql, params, map)?)
    }

    /// Every row of `sql`, mapped in order.
    pub fn query_map<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> StorageResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        trace!(sql, "query_map");
        let mut stmt = self.inner.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Run `f` inside one transaction: committed when it returns `Ok`, rolled
    /// back when it returns `Err`, whose error is handed back unchanged.
    pub fn with_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<StorageError>,
    {
        let tx = Transaction { inner: Some(self.inner.transaction().map_err(StorageError::from)?) };

        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    debug!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

impl Deref for SqliteConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.inner
    }
}

/// Open transaction handed to [`SqliteConnection::with_transaction`]. Rolls
/// back on drop unless committed.
pub struct Transaction<'conn> {
    inner: Option<rusqlite::Transaction<'conn>>,
}

impl<'conn> Transaction<'conn> {
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> StorageResult<usize> {
        Ok(self.open()?.execute(sql, params)?)
    }

    pub fn query_row<T, F>(&self, sql: &str, params: &[&dyn ToSql], map: F) -> StorageResult<T>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        Ok(self.open()?.query_row(sql, params, map)?)
    }

    pub fn last_insert_rowid(&self) -> StorageResult<i64> {
        Ok(self.open()?.last_insert_rowid())
    }

    pub fn commit(mut self) -> StorageResult<()> {
        let tx = self.inner.take().ok_or(StorageError::TransactionFinished)?;
        Ok(tx.commit()?)
    }

    pub fn rollback(mut self) -> StorageResult<()> {
        let tx = self.inner.take().ok_or(StorageError::TransactionFinished)?;
        Ok(tx.rollback()?)
    }

    fn open(&self) -> StorageResult<&rusqlite::Transaction<'conn>> {
        self.inner.as_ref().ok_or(StorageError::TransactionFinished)
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if let Some(tx) = self.inner.take() {
            let _ = tx.rollback();
        }
    }
}
