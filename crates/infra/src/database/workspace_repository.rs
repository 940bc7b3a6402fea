//! SQLite-backed implementation of the `WorkspaceRepository` port.
//!
//! Timestamps are stored as unix seconds. Process start and creation times
//! are taken from SQLite's clock (`strftime('%s','now')`) so every row written
//! by the store agrees on one time source.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use quickstart_common::storage::{SqliteConnection, StorageError, Transaction};
use quickstart_core::WorkspaceRepository as WorkspaceRepositoryPort;
use quickstart_domain::{
    ActiveProcess, NewUsageSession, QuickStartError, Result, UsageSession, Workspace, WorkspaceId,
    WorkspaceStatus, WorkspaceSummary,
};
use rusqlite::types::Type;
use rusqlite::{Row, ToSql};
use tracing::warn;

use super::manager::DbManager;
use crate::errors::{is_unique_violation, log_storage_failure, InfraError};

/// SQLite-backed store for workspaces, the process ledger and usage history.
pub struct SqliteWorkspaceRepository {
    db: Arc<DbManager>,
}

impl SqliteWorkspaceRepository {
    /// Create a repository backed by the shared SQLite pool.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    fn connection(&self, operation: &'static str) -> Result<SqliteConnection> {
        self.db.get_connection().inspect_err(|err| {
            warn!(operation, error = %err, "storage connection unavailable");
        })
    }
}

impl WorkspaceRepositoryPort for SqliteWorkspaceRepository {
    fn create_workspace(&self, name: &str, file_paths: &[String]) -> Result<WorkspaceId> {
        if file_paths.is_empty() {
            return Err(QuickStartError::InvalidInput(format!(
                "workspace '{name}' needs at least one file"
            )));
        }

        self.db.with_transaction("workspace.create", |tx| {
            let params: [&dyn ToSql; 1] = [&name];
            tx.execute(WORKSPACE_INSERT_SQL, params.as_slice()).map_err(|err| {
                if is_unique_violation(&err) {
                    InfraError(QuickStartError::DuplicateName(name.to_string()))
                } else {
                    InfraError::from(err)
                }
            })?;
            let workspace_id = tx.last_insert_rowid()?;

            for path in file_paths {
                let params: [&dyn ToSql; 2] = [&workspace_id, path];
                tx.execute(FILE_INSERT_SQL, params.as_slice())?;
            }

            Ok(workspace_id)
        })
    }

    fn list_workspaces(&self) -> Result<Vec<WorkspaceSummary>> {
        let conn = self.connection("workspace.list.connection")?;
        conn.query_map(WORKSPACE_SUMMARY_QUERY, &[], map_summary_row)
            .map_err(|err| map_storage_error("workspace.list.query", err))
    }

    fn find_workspace(&self, name: &str) -> Result<Option<Workspace>> {
        let conn = self.connection("workspace.find.connection")?;
        let mut rows = conn.query_map(WORKSPACE_BY_NAME_QUERY, &[&name], map_workspace_row)
            .map_err(|err| map_storage_error("workspace.find.query", err))?;
        Ok(rows.pop())
    }

    fn workspace_id(&self, name: &str) -> Result<WorkspaceId> {
        self.find_workspace(name)?
            .map(|workspace| workspace.id)
            .ok_or_else(|| QuickStartError::NotFound(name.to_string()))
    }

    fn list_files(&self, workspace_id: WorkspaceId) -> Result<Vec<String>> {
        let conn = self.connection("workspace.files.connection")?;
        conn.query_map(FILES_BY_WORKSPACE_QUERY, &[&workspace_id], |row| row.get(0))
            .map_err(|err| map_storage_error("workspace.files.query", err))
    }

    fn delete_workspace(&self, name: &str) -> Result<()> {
        let conn = self.connection("workspace.delete.connection")?;
        let params: [&dyn ToSql; 1] = [&name];
        let deleted = conn
            .execute(WORKSPACE_DELETE_SQL, params.as_slice())
            .map_err(|err| map_storage_error("workspace.delete.execute", err))?;

        if deleted == 0 {
            return Err(QuickStartError::NotFound(name.to_string()));
        }
        Ok(())
    }

    fn record_process_start(
        &self,
        workspace_id: WorkspaceId,
        pid: u32,
        file_path: &str,
    ) -> Result<ActiveProcess> {
        self.db.with_transaction("process.record_start", |tx| {
            let params: [&dyn ToSql; 3] = [&workspace_id, &pid, &file_path];
            tx.execute(PROCESS_INSERT_SQL, params.as_slice())?;
            let id = tx.last_insert_rowid()?;
            let process = tx.query_row(PROCESS_BY_ID_QUERY, &[&id], map_process_row)?;
            Ok(process)
        })
    }

    fn list_active_processes(&self, workspace_id: WorkspaceId) -> Result<Vec<ActiveProcess>> {
        let conn = self.connection("process.list.connection")?;
        conn.query_map(PROCESSES_BY_WORKSPACE_QUERY, &[&workspace_id], map_process_row)
            .map_err(|err| map_storage_error("process.list.query", err))
    }

    fn remove_active_process(&self, process_id: i64) -> Result<bool> {
        let conn = self.connection("process.remove.connection")?;
        let params: [&dyn ToSql; 1] = [&process_id];
        let removed = conn
            .execute(PROCESS_DELETE_SQL, params.as_slice())
            .map_err(|err| map_storage_error("process.remove.execute", err))?;
        Ok(removed > 0)
    }

    fn active_workspace_names(&self) -> Result<Vec<String>> {
        let conn = self.connection("process.active_workspaces.connection")?;
        conn.query_map(ACTIVE_WORKSPACE_NAMES_QUERY, &[], |row| row.get(0))
            .map_err(|err| map_storage_error("process.active_workspaces.query", err))
    }

    fn record_usage_session(&self, session: &NewUsageSession) -> Result<UsageSession> {
        ensure_non_negative(session.duration_seconds)?;
        self.db.with_transaction("usage.record_session", |tx| insert_session(tx, session))
    }

    fn increment_usage(&self, workspace_id: WorkspaceId, delta_seconds: i64) -> Result<()> {
        ensure_non_negative(delta_seconds)?;
        self.db.with_transaction("usage.increment", |tx| {
            add_usage(tx, workspace_id, delta_seconds)
        })
    }

    fn close_process(
        &self,
        process: &ActiveProcess,
        session: &NewUsageSession,
    ) -> Result<UsageSession> {
        ensure_non_negative(session.duration_seconds)?;
        self.db.with_transaction("process.close", |tx| {
            let stored = insert_session(tx, session)?;
            add_usage(tx, process.workspace_id, session.duration_seconds)?;
            let params: [&dyn ToSql; 1] = [&process.id];
            tx.execute(PROCESS_DELETE_SQL, params.as_slice())?;
            Ok(stored)
        })
    }

    fn bump_activation(&self, workspace_id: WorkspaceId, at: DateTime<Utc>) -> Result<()> {
        let conn = self.connection("workspace.activate.connection")?;
        let activated_at = at.timestamp();
        let params: [&dyn ToSql; 2] = [&workspace_id, &activated_at];
        let updated = conn
            .execute(WORKSPACE_ACTIVATE_SQL, params.as_slice())
            .map_err(|err| map_storage_error("workspace.activate.execute", err))?;

        if updated == 0 {
            return Err(QuickStartError::NotFound(format!("id {workspace_id}")));
        }
        Ok(())
    }

    fn list_usage_sessions(&self, workspace_id: WorkspaceId) -> Result<Vec<UsageSession>> {
        let conn = self.connection("usage.list.connection")?;
        conn.query_map(SESSIONS_BY_WORKSPACE_QUERY, &[&workspace_id], map_session_row)
            .map_err(|err| map_storage_error("usage.list.query", err))
    }
}

const WORKSPACE_INSERT_SQL: &str = "INSERT INTO workspaces (name, created_at)
    VALUES (?1, CAST(strftime('%s','now') AS INTEGER))";

const FILE_INSERT_SQL: &str =
    "INSERT INTO workspace_files (workspace_id, file_path) VALUES (?1, ?2)";

const WORKSPACE_SUMMARY_QUERY: &str = "SELECT w.name, w.created_at, w.last_activated_at,
        w.activate_count, w.total_usage_seconds,
        (SELECT COUNT(*) FROM workspace_files f WHERE f.workspace_id = w.id),
        (SELECT COUNT(*) FROM active_processes p WHERE p.workspace_id = w.id)
    FROM workspaces w
    ORDER BY w.last_activated_at IS NULL, w.last_activated_at DESC, w.name";

const WORKSPACE_BY_NAME_QUERY: &str = "SELECT id, name, created_at, last_activated_at,
        activate_count, total_usage_seconds
    FROM workspaces
    WHERE name = ?1";

const FILES_BY_WORKSPACE_QUERY: &str =
    "SELECT file_path FROM workspace_files WHERE workspace_id = ?1 ORDER BY id";

const WORKSPACE_DELETE_SQL: &str = "DELETE FROM workspaces WHERE name = ?1";

const WORKSPACE_ACTIVATE_SQL: &str = "UPDATE workspaces
    SET activate_count = activate_count + 1, last_activated_at = ?2
    WHERE id = ?1";

const WORKSPACE_ADD_USAGE_SQL: &str =
    "UPDATE workspaces SET total_usage_seconds = total_usage_seconds + ?2 WHERE id = ?1";

const PROCESS_INSERT_SQL: &str = "INSERT INTO active_processes (workspace_id, pid, file_path, started_at)
    VALUES (?1, ?2, ?3, CAST(strftime('%s','now') AS INTEGER))";

const PROCESS_BY_ID_QUERY: &str =
    "SELECT id, workspace_id, pid, file_path, started_at FROM active_processes WHERE id = ?1";

const PROCESSES_BY_WORKSPACE_QUERY: &str = "SELECT id, workspace_id, pid, file_path, started_at
    FROM active_processes
    WHERE workspace_id = ?1
    ORDER BY id";

const PROCESS_DELETE_SQL: &str = "DELETE FROM active_processes WHERE id = ?1";

const ACTIVE_WORKSPACE_NAMES_QUERY: &str = "SELECT DISTINCT w.name
    FROM workspaces w
    JOIN active_processes p ON p.workspace_id = w.id
    ORDER BY w.name";

const SESSION_INSERT_SQL: &str = "INSERT INTO workspace_usage
        (workspace_id, started_at, ended_at, duration_seconds)
    VALUES (?1, ?2, ?3, ?4)";

const SESSIONS_BY_WORKSPACE_QUERY: &str = "SELECT id, workspace_id, started_at, ended_at,
        duration_seconds
    FROM workspace_usage
    WHERE workspace_id = ?1
    ORDER BY ended_at DESC, id DESC";

fn insert_session(
    tx: &Transaction<'_>,
    session: &NewUsageSession,
) -> std::result::Result<UsageSession, InfraError> {
    let started_at = session.started_at.timestamp();
    let ended_at = session.ended_at.timestamp();
    let params: [&dyn ToSql; 4] =
        [&session.workspace_id, &started_at, &ended_at, &session.duration_seconds];
    tx.execute(SESSION_INSERT_SQL, params.as_slice())?;

    Ok(UsageSession {
        id: tx.last_insert_rowid()?,
        workspace_id: session.workspace_id,
        started_at: session.started_at,
        ended_at: session.ended_at,
        duration_seconds: session.duration_seconds,
    })
}

fn add_usage(
    tx: &Transaction<'_>,
    workspace_id: WorkspaceId,
    delta_seconds: i64,
) -> std::result::Result<(), InfraError> {
    let params: [&dyn ToSql; 2] = [&workspace_id, &delta_seconds];
    let updated = tx.execute(WORKSPACE_ADD_USAGE_SQL, params.as_slice())?;
    if updated == 0 {
        return Err(InfraError(QuickStartError::NotFound(format!("id {workspace_id}"))));
    }
    Ok(())
}

fn ensure_non_negative(seconds: i64) -> Result<()> {
    if seconds < 0 {
        return Err(QuickStartError::InvalidInput(format!(
            "usage duration must be non-negative, got {seconds}"
        )));
    }
    Ok(())
}

fn map_workspace_row(row: &Row<'_>) -> rusqlite::Result<Workspace> {
    Ok(Workspace {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: timestamp_column(row, 2)?,
        last_activated_at: optional_timestamp_column(row, 3)?,
        activate_count: row.get(4)?,
        total_usage_seconds: row.get(5)?,
    })
}

fn map_summary_row(row: &Row<'_>) -> rusqlite::Result<WorkspaceSummary> {
    let active_processes: i64 = row.get(6)?;
    Ok(WorkspaceSummary {
        name: row.get(0)?,
        created_at: timestamp_column(row, 1)?,
        last_activated_at: optional_timestamp_column(row, 2)?,
        activate_count: row.get(3)?,
        total_usage_seconds: row.get(4)?,
        file_count: row.get(5)?,
        status: WorkspaceStatus::from_active_count(active_processes),
    })
}

fn map_process_row(row: &Row<'_>) -> rusqlite::Result<ActiveProcess> {
    Ok(ActiveProcess {
        id: row.get(0)?,
        workspace_id: row.get(1)?,
        pid: row.get(2)?,
        file_path: row.get(3)?,
        started_at: timestamp_column(row, 4)?,
    })
}

fn map_session_row(row: &Row<'_>) -> rusqlite::Result<UsageSession> {
    Ok(UsageSession {
        id: row.get(0)?,
        workspace_id: row.get(1)?,
        started_at: timestamp_column(row, 2)?,
        ended_at: timestamp_column(row, 3)?,
        duration_seconds: row.get(4)?,
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let seconds: i64 = row.get(idx)?;
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp out of range: {seconds}").into(),
        )
    })
}

fn optional_timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let seconds: Option<i64> = row.get(idx)?;
    seconds
        .map(|seconds| {
            DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    Type::Integer,
                    format!("timestamp out of range: {seconds}").into(),
                )
            })
        })
        .transpose()
}

fn map_storage_error(operation: &'static str, err: StorageError) -> QuickStartError {
    log_storage_failure(operation, &err);
    QuickStartError::from(InfraError::from(err))
}
