//! Outcomes of `start` and `stop`

use serde::{Deserialize, Serialize};

use super::process::ActiveProcess;

/// A file that could not be launched. Recorded and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchFailure {
    pub path: String,
    pub message: String,
}

/// Result of starting a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartReport {
    pub workspace: String,
    pub files_total: usize,
    pub launched: Vec<ActiveProcess>,
    pub failures: Vec<LaunchFailure>,
    /// Whether activation stats were bumped (false only for an empty file
    /// list).
    pub activated: bool,
}

impl StartReport {
    /// True when the workspace had files and every one of them launched.
    pub fn success(&self) -> bool {
        self.files_total > 0 && self.failures.is_empty()
    }
}

/// What happened to one ledger process during `stop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminationOutcome {
    Terminated { descendants: usize },
    AlreadyExited,
    Failed { message: String },
}

/// Per-process line of a stop report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutcome {
    pub pid: u32,
    pub file_path: String,
    pub termination: TerminationOutcome,
    /// Seconds credited to the workspace for this process.
    pub duration_seconds: i64,
}

/// Result of stopping a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopReport {
    pub workspace: String,
    pub processes: Vec<ProcessOutcome>,
    /// Sum of `duration_seconds` over `processes`.
    pub total_seconds: i64,
}

impl StopReport {
    /// Nothing was running.
    pub fn was_idle(&self) -> bool {
        self.processes.is_empty()
    }

    /// Processes that were alive but could not be terminated.
    pub fn termination_failures(&self) -> impl Iterator<Item = &ProcessOutcome> {
        self.processes
            .iter()
            .filter(|outcome| matches!(outcome.termination, TerminationOutcome::Failed { .. }))
    }
}
