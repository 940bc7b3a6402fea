//! Start/stop orchestration for a workspace's processes

use std::sync::Arc;

use chrono::Duration;
use quickstart_domain::{
    ActiveProcess, LaunchFailure, NewUsageSession, ProcessOutcome, Result, StartReport,
    StopReport, TerminationOutcome, UsageAccounting,
};
use tracing::{debug, error, info, warn};

use super::accounting::credit_batch;
use super::ports::{Clock, ProcessInspector, ProcessLauncher, SystemClock};
use crate::workspace::ports::WorkspaceRepository;

/// Ledger timestamps come from the store's clock at whole-second precision and
/// are written after the spawn, so a genuine process never appears to start
/// later than this past its recorded start.
const PID_REUSE_SLACK_SECS: i64 = 2;

/// Process lifecycle coordinator
///
/// Owns no state between invocations: the process ledger in the store is the
/// only record of what `start` launched.
pub struct LifecycleCoordinator {
    repository: Arc<dyn WorkspaceRepository>,
    launcher: Arc<dyn ProcessLauncher>,
    inspector: Arc<dyn ProcessInspector>,
    clock: Arc<dyn Clock>,
    accounting: UsageAccounting,
}

impl LifecycleCoordinator {
    /// Create a coordinator using the system clock and per-process
    /// accounting.
    pub fn new(
        repository: Arc<dyn WorkspaceRepository>,
        launcher: Arc<dyn ProcessLauncher>,
        inspector: Arc<dyn ProcessInspector>,
    ) -> Self {
        Self {
            repository,
            launcher,
            inspector,
            clock: Arc::new(SystemClock),
            accounting: UsageAccounting::default(),
        }
    }

    /// Replace the clock used for activation and stop timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Choose how concurrent processes are credited at stop time.
    pub fn with_accounting(mut self, accounting: UsageAccounting) -> Self {
        self.accounting = accounting;
        self
    }

    /// Launch every file of `name` and record the spawned processes.
    ///
    /// Launch failures are collected in the report. Storage failures abort.
    /// Activation stats are bumped whenever the workspace has files, even if
    /// some or all launches failed.
    pub fn start(&self, name: &str) -> Result<StartReport> {
        let workspace_id = self.repository.workspace_id(name)?;
        let files = self.repository.list_files(workspace_id)?;

        if files.is_empty() {
            warn!(workspace = name, "workspace.start.no_files");
            return Ok(StartReport {
                workspace: name.to_string(),
                files_total: 0,
                launched: Vec::new(),
                failures: Vec::new(),
                activated: false,
            });
        }

        let mut launched = Vec::with_capacity(files.len());
        let mut failures = Vec::new();

        for path in &files {
            let pid = match self.launcher.launch(path) {
                Ok(pid) => pid,
                Err(err) => {
                    warn!(workspace = name, path = %path, error = %err, "workspace.start.launch_failed");
                    failures.push(LaunchFailure { path: path.clone(), message: err.to_string() });
                    continue;
                }
            };

            let process = self
                .repository
                .record_process_start(workspace_id, pid, path)
                .inspect_err(|err| {
                    error!(workspace = name, pid, path = %path, error = %err, "workspace.start.ledger_write_failed");
                })?;
            debug!(workspace = name, pid, path = %path, "workspace.start.launched");
            launched.push(process);
        }

        self.repository.bump_activation(workspace_id, self.clock.now())?;

        info!(
            workspace = name,
            launched = launched.len(),
            failed = failures.len(),
            "workspace.start.completed"
        );

        Ok(StartReport {
            workspace: name.to_string(),
            files_total: files.len(),
            launched,
            failures,
            activated: true,
        })
    }

    /// Terminate every tracked process of `name` and close its usage
    /// sessions.
    ///
    /// Each ledger row is closed in its own transaction whether or not the
    /// process was still alive. Termination failures are reported, not
    /// returned.
    pub fn stop(&self, name: &str) -> Result<StopReport> {
        let workspace_id = self.repository.workspace_id(name)?;
        let processes = self.repository.list_active_processes(workspace_id)?;

        if processes.is_empty() {
            debug!(workspace = name, "workspace.stop.nothing_running");
            return Ok(StopReport { workspace: name.to_string(), processes: Vec::new(), total_seconds: 0 });
        }

        let ended_at = self.clock.now();
        let credits = credit_batch(&processes, ended_at, self.accounting);

        let mut outcomes = Vec::with_capacity(processes.len());
        for (process, credit) in processes.iter().zip(credits) {
            let termination = self.terminate_tree(name, process);

            let mut session = NewUsageSession::for_process(process, ended_at);
            session.duration_seconds = credit;
            self.repository.close_process(process, &session)?;

            outcomes.push(ProcessOutcome {
                pid: process.pid,
                file_path: process.file_path.clone(),
                termination,
                duration_seconds: credit,
            });
        }

        let total_seconds = outcomes.iter().map(|outcome| outcome.duration_seconds).sum();
        info!(
            workspace = name,
            processes = outcomes.len(),
            total_seconds,
            accounting = %self.accounting,
            "workspace.stop.completed"
        );

        Ok(StopReport { workspace: name.to_string(), processes: outcomes, total_seconds })
    }

    /// Names of workspaces with tracked processes.
    pub fn active_workspaces(&self) -> Result<Vec<String>> {
        self.repository.active_workspace_names()
    }

    fn terminate_tree(&self, workspace: &str, process: &ActiveProcess) -> TerminationOutcome {
        let pid = process.pid;
        if !self.inspector.exists(pid) {
            warn!(workspace, pid, path = %process.file_path, "workspace.stop.already_exited");
            return TerminationOutcome::AlreadyExited;
        }
        if let Some(live_since) = self.inspector.start_time(pid) {
            if live_since > process.started_at + Duration::seconds(PID_REUSE_SLACK_SECS) {
                warn!(
                    workspace,
                    pid,
                    path = %process.file_path,
                    recorded = %process.started_at,
                    live_since = %live_since,
                    "workspace.stop.pid_reused"
                );
                return TerminationOutcome::AlreadyExited;
            }
        }

        let descendants = self.inspector.descendants(pid);
        for child in descendants.iter().rev() {
            if let Err(err) = self.inspector.terminate(*child) {
                warn!(workspace, pid, child, error = %err, "workspace.stop.descendant_terminate_failed");
            }
        }

        match self.inspector.terminate(pid) {
            Ok(()) => {
                debug!(workspace, pid, descendants = descendants.len(), "workspace.stop.terminated");
                TerminationOutcome::Terminated { descendants: descendants.len() }
            }
            Err(err) => {
                warn!(workspace, pid, error = %err, "workspace.stop.terminate_failed");
                TerminationOutcome::Failed { message: err.to_string() }
            }
        }
    }
}
