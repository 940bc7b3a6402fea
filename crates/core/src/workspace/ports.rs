//! Port interfaces for the workspace catalogue
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use quickstart_domain::{
    ActiveProcess, NewUsageSession, Result, UsageSession, Workspace, WorkspaceId, WorkspaceSummary,
};

/// Persistent store for workspaces, their files, the process ledger and
/// usage sessions.
///
/// Every method is one logical write or read. Multi-row writes are atomic.
pub trait WorkspaceRepository: Send + Sync {
    // Catalogue
    /// Insert a workspace and its files atomically.
    ///
    /// Fails with `DuplicateName` if the name exists and `InvalidInput` if
    /// `file_paths` is empty; nothing is written in either case.
    fn create_workspace(&self, name: &str, file_paths: &[String]) -> Result<WorkspaceId>;

    /// Summaries ordered by most recent activation first; never-activated
    /// workspaces come last, ties broken by name.
    fn list_workspaces(&self) -> Result<Vec<WorkspaceSummary>>;

    /// Look up a workspace by name.
    fn find_workspace(&self, name: &str) -> Result<Option<Workspace>>;

    /// Resolve a name to its id, or `NotFound`.
    fn workspace_id(&self, name: &str) -> Result<WorkspaceId>;

    /// File paths in insertion order.
    fn list_files(&self, workspace_id: WorkspaceId) -> Result<Vec<String>>;

    /// Delete a workspace and everything that references it, or `NotFound`.
    fn delete_workspace(&self, name: &str) -> Result<()>;

    // Process ledger
    /// Record a launched process. The start time comes from the store's
    /// clock.
    fn record_process_start(
        &self,
        workspace_id: WorkspaceId,
        pid: u32,
        file_path: &str,
    ) -> Result<ActiveProcess>;

    fn list_active_processes(&self, workspace_id: WorkspaceId) -> Result<Vec<ActiveProcess>>;

    /// Remove a ledger row. Returns whether a row existed; removing a missing
    /// row is not an error.
    fn remove_active_process(&self, process_id: i64) -> Result<bool>;

    /// Names of workspaces with at least one ledger row.
    fn active_workspace_names(&self) -> Result<Vec<String>>;

    // Usage
    /// Append a usage session without touching the accumulator.
    fn record_usage_session(&self, session: &NewUsageSession) -> Result<UsageSession>;

    /// Add `delta_seconds` (must be non-negative) to the accumulator.
    fn increment_usage(&self, workspace_id: WorkspaceId, delta_seconds: i64) -> Result<()>;

    /// Append `session`, add its duration to the accumulator and remove
    /// `process` from the ledger in a single transaction.
    fn close_process(
        &self,
        process: &ActiveProcess,
        session: &NewUsageSession,
    ) -> Result<UsageSession>;

    /// Increment the activation count and set the last-activated time.
    fn bump_activation(&self, workspace_id: WorkspaceId, at: DateTime<Utc>) -> Result<()>;

    /// Sessions newest first.
    fn list_usage_sessions(&self, workspace_id: WorkspaceId) -> Result<Vec<UsageSession>>;
}

/// Interactive selection of a single file.
pub trait FilePicker {
    /// `Ok(None)` means the user chose nothing.
    fn pick_file(&self) -> Result<Option<PathBuf>>;
}
