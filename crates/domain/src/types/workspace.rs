//! Workspace records and the listing read model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Primary key of a workspace row.
pub type WorkspaceId = i64;

/// A named group of files that is started and stopped together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_activated_at: Option<DateTime<Utc>>,
    /// Number of `start` invocations; never decreases.
    pub activate_count: i64,
    /// Sum of all recorded session durations; never decreases.
    pub total_usage_seconds: i64,
}

/// Whether any launched process of a workspace is still in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceStatus {
    Running,
    Stopped,
}

impl WorkspaceStatus {
    pub fn from_active_count(active_processes: i64) -> Self {
        if active_processes > 0 {
            Self::Running
        } else {
            Self::Stopped
        }
    }
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

/// One row of `qs ls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSummary {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_activated_at: Option<DateTime<Utc>>,
    pub activate_count: i64,
    pub file_count: i64,
    pub total_usage_seconds: i64,
    pub status: WorkspaceStatus,
}
