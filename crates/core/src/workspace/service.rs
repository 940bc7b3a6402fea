//! Workspace catalogue service - core business logic

use std::sync::Arc;

use quickstart_domain::{
    validate_workspace_name, QuickStartError, Result, UsageSession, WorkspaceId, WorkspaceSummary,
};
use tracing::{debug, warn};

use super::ports::WorkspaceRepository;

/// Create, list, delete and inspect workspaces
pub struct WorkspaceService {
    repository: Arc<dyn WorkspaceRepository>,
}

impl WorkspaceService {
    /// Create a new workspace service
    pub fn new(repository: Arc<dyn WorkspaceRepository>) -> Self {
        Self { repository }
    }

    /// Register a named workspace with its ordered file list.
    ///
    /// The name is validated before the store is touched. An empty file list
    /// is rejected.
    pub fn create(&self, name: &str, file_paths: &[String]) -> Result<WorkspaceId> {
        validate_workspace_name(name)?;
        if file_paths.is_empty() {
            return Err(QuickStartError::InvalidInput(format!(
                "workspace '{name}' needs at least one file"
            )));
        }

        let id = self.repository.create_workspace(name, file_paths)?;
        debug!(workspace = name, workspace_id = id, files = file_paths.len(), "workspace.create");
        Ok(id)
    }

    /// All workspaces with their stats, most recently activated first.
    pub fn list(&self) -> Result<Vec<WorkspaceSummary>> {
        self.repository.list_workspaces()
    }

    /// Remove a workspace with its files, ledger rows and usage history.
    ///
    /// Processes still running are not terminated; they simply stop being
    /// tracked.
    pub fn delete(&self, name: &str) -> Result<()> {
        let id = self.repository.workspace_id(name)?;
        let running = self.repository.list_active_processes(id)?;
        if !running.is_empty() {
            warn!(
                workspace = name,
                processes = running.len(),
                "workspace.delete.untracking_running_processes"
            );
        }

        self.repository.delete_workspace(name)?;
        debug!(workspace = name, workspace_id = id, "workspace.delete");
        Ok(())
    }

    /// Completed usage sessions, newest first.
    pub fn history(&self, name: &str) -> Result<Vec<UsageSession>> {
        let id = self.repository.workspace_id(name)?;
        self.repository.list_usage_sessions(id)
    }

    /// File paths of a workspace in launch order.
    pub fn files(&self, name: &str) -> Result<Vec<String>> {
        let id = self.repository.workspace_id(name)?;
        self.repository.list_files(id)
    }
}
