//! Process ledger rows and usage sessions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::workspace::WorkspaceId;

/// A launched OS process that may still be running.
///
/// Rows exist from launch until the next `stop` of the owning workspace,
/// whether or not the process is still alive by then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveProcess {
    pub id: i64,
    pub workspace_id: WorkspaceId,
    pub pid: u32,
    pub file_path: String,
    pub started_at: DateTime<Utc>,
}

/// A completed interval of workspace activity. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSession {
    pub id: i64,
    pub workspace_id: WorkspaceId,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_seconds: i64,
}

/// Session values computed at stop time, before they are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewUsageSession {
    pub workspace_id: WorkspaceId,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_seconds: i64,
}

impl NewUsageSession {
    /// Session for `process` ending at `ended_at`, credited with its full
    /// elapsed time in whole seconds (floored, never negative).
    pub fn for_process(process: &ActiveProcess, ended_at: DateTime<Utc>) -> Self {
        Self {
            workspace_id: process.workspace_id,
            started_at: process.started_at,
            ended_at,
            duration_seconds: elapsed_seconds(process.started_at, ended_at),
        }
    }
}

/// Whole seconds between two instants, clamped at zero when the clock
/// went backwards.
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_seconds().max(0)
}
