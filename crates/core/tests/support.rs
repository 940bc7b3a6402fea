//! In-memory fakes for the core ports.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use quickstart_core::{
    Clock, LifecycleCoordinator, ProcessInspector, ProcessLauncher, WorkspaceRepository,
    WorkspaceService,
};
use quickstart_domain::{
    ActiveProcess, NewUsageSession, QuickStartError, Result, UsageAccounting, UsageSession,
    Workspace, WorkspaceId, WorkspaceStatus, WorkspaceSummary,
};

/// Manually advanced clock.
pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
}

impl MockClock {
    pub fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).single().expect("valid start time");
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, seconds: i64) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += Duration::seconds(seconds);
    }

    pub fn rewind(&self, seconds: i64) {
        self.advance(-seconds);
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}

#[derive(Default)]
struct StoreState {
    next_id: i64,
    workspaces: Vec<Workspace>,
    files: HashMap<WorkspaceId, Vec<String>>,
    active: Vec<ActiveProcess>,
    sessions: Vec<UsageSession>,
}

impl StoreState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn workspace_mut(&mut self, id: WorkspaceId) -> Result<&mut Workspace> {
        self.workspaces
            .iter_mut()
            .find(|workspace| workspace.id == id)
            .ok_or_else(|| QuickStartError::Database(format!("no workspace with id {id}")))
    }
}

/// Store backed by a mutex-guarded struct. Start times come from the shared
/// clock, like the SQLite store's `now`.
pub struct InMemoryRepository {
    clock: Arc<MockClock>,
    state: Mutex<StoreState>,
    fail_ledger_writes: AtomicBool,
    fail_close: AtomicBool,
}

impl InMemoryRepository {
    pub fn new(clock: Arc<MockClock>) -> Self {
        Self {
            clock,
            state: Mutex::new(StoreState::default()),
            fail_ledger_writes: AtomicBool::new(false),
            fail_close: AtomicBool::new(false),
        }
    }

    pub fn fail_ledger_writes(&self) {
        self.fail_ledger_writes.store(true, Ordering::SeqCst);
    }

    pub fn fail_close(&self) {
        self.fail_close.store(true, Ordering::SeqCst);
    }

    pub fn workspace(&self, name: &str) -> Workspace {
        self.find_workspace(name).expect("lookup failed").expect("workspace should exist")
    }

    pub fn session_count(&self) -> usize {
        self.state.lock().expect("store lock poisoned").sessions.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().expect("store lock poisoned")
    }
}

impl WorkspaceRepository for InMemoryRepository {
    fn create_workspace(&self, name: &str, file_paths: &[String]) -> Result<WorkspaceId> {
        if file_paths.is_empty() {
            return Err(QuickStartError::InvalidInput("no files".into()));
        }
        let mut state = self.lock();
        if state.workspaces.iter().any(|workspace| workspace.name == name) {
            return Err(QuickStartError::DuplicateName(name.to_string()));
        }
        let id = state.next_id();
        state.workspaces.push(Workspace {
            id,
            name: name.to_string(),
            created_at: self.clock.now(),
            last_activated_at: None,
            activate_count: 0,
            total_usage_seconds: 0,
        });
        state.files.insert(id, file_paths.to_vec());
        Ok(id)
    }

    fn list_workspaces(&self) -> Result<Vec<WorkspaceSummary>> {
        let state = self.lock();
        let mut summaries: Vec<WorkspaceSummary> = state
            .workspaces
            .iter()
            .map(|workspace| {
                let running = state.active.iter().filter(|p| p.workspace_id == workspace.id).count();
                WorkspaceSummary {
                    name: workspace.name.clone(),
                    created_at: workspace.created_at,
                    last_activated_at: workspace.last_activated_at,
                    activate_count: workspace.activate_count,
                    file_count: state.files.get(&workspace.id).map_or(0, Vec::len) as i64,
                    total_usage_seconds: workspace.total_usage_seconds,
                    status: WorkspaceStatus::from_active_count(running as i64),
                }
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.last_activated_at.cmp(&a.last_activated_at).then_with(|| a.name.cmp(&b.name))
        });
        Ok(summaries)
    }

    fn find_workspace(&self, name: &str) -> Result<Option<Workspace>> {
        Ok(self.lock().workspaces.iter().find(|workspace| workspace.name == name).cloned())
    }

    fn workspace_id(&self, name: &str) -> Result<WorkspaceId> {
        self.find_workspace(name)?
            .map(|workspace| workspace.id)
            .ok_or_else(|| QuickStartError::NotFound(name.to_string()))
    }

    fn list_files(&self, workspace_id: WorkspaceId) -> Result<Vec<String>> {
        Ok(self.lock().files.get(&workspace_id).cloned().unwrap_or_default())
    }

    fn delete_workspace(&self, name: &str) -> Result<()> {
        let id = self.workspace_id(name)?;
        let mut state = self.lock();
        state.workspaces.retain(|workspace| workspace.id != id);
        state.files.remove(&id);
        state.active.retain(|process| process.workspace_id != id);
        state.sessions.retain(|session| session.workspace_id != id);
        Ok(())
    }

    fn record_process_start(
        &self,
        workspace_id: WorkspaceId,
        pid: u32,
        file_path: &str,
    ) -> Result<ActiveProcess> {
        if self.fail_ledger_writes.load(Ordering::SeqCst) {
            return Err(QuickStartError::Database("disk I/O error".into()));
        }
        let mut state = self.lock();
        let process = ActiveProcess {
            id: state.next_id(),
            workspace_id,
            pid,
            file_path: file_path.to_string(),
            started_at: self.clock.now(),
        };
        state.active.push(process.clone());
        Ok(process)
    }

    fn list_active_processes(&self, workspace_id: WorkspaceId) -> Result<Vec<ActiveProcess>> {
        Ok(self
            .lock()
            .active
            .iter()
            .filter(|process| process.workspace_id == workspace_id)
            .cloned()
            .collect())
    }

    fn remove_active_process(&self, process_id: i64) -> Result<bool> {
        let mut state = self.lock();
        let before = state.active.len();
        state.active.retain(|process| process.id != process_id);
        Ok(state.active.len() != before)
    }

    fn active_workspace_names(&self) -> Result<Vec<String>> {
        let state = self.lock();
        let mut names: Vec<String> = state
            .workspaces
            .iter()
            .filter(|workspace| state.active.iter().any(|p| p.workspace_id == workspace.id))
            .map(|workspace| workspace.name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn record_usage_session(&self, session: &NewUsageSession) -> Result<UsageSession> {
        let mut state = self.lock();
        let stored = UsageSession {
            id: state.next_id(),
            workspace_id: session.workspace_id,
            started_at: session.started_at,
            ended_at: session.ended_at,
            duration_seconds: session.duration_seconds,
        };
        state.sessions.push(stored.clone());
        Ok(stored)
    }

    fn increment_usage(&self, workspace_id: WorkspaceId, delta_seconds: i64) -> Result<()> {
        if delta_seconds < 0 {
            return Err(QuickStartError::InvalidInput("negative usage delta".into()));
        }
        self.lock().workspace_mut(workspace_id)?.total_usage_seconds += delta_seconds;
        Ok(())
    }

    fn close_process(
        &self,
        process: &ActiveProcess,
        session: &NewUsageSession,
    ) -> Result<UsageSession> {
        if self.fail_close.load(Ordering::SeqCst) {
            return Err(QuickStartError::Database("database is locked".into()));
        }
        let stored = self.record_usage_session(session)?;
        self.increment_usage(process.workspace_id, session.duration_seconds)?;
        self.remove_active_process(process.id)?;
        Ok(stored)
    }

    fn bump_activation(&self, workspace_id: WorkspaceId, at: DateTime<Utc>) -> Result<()> {
        let mut state = self.lock();
        let workspace = state.workspace_mut(workspace_id)?;
        workspace.activate_count += 1;
        workspace.last_activated_at = Some(at);
        Ok(())
    }

    fn list_usage_sessions(&self, workspace_id: WorkspaceId) -> Result<Vec<UsageSession>> {
        let mut sessions: Vec<UsageSession> = self
            .lock()
            .sessions
            .iter()
            .filter(|session| session.workspace_id == workspace_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.ended_at.cmp(&a.ended_at).then_with(|| b.id.cmp(&a.id)));
        Ok(sessions)
    }
}

#[derive(Default)]
struct OsState {
    next_pid: u32,
    /// Live pid -> parent pid.
    alive: HashMap<u32, Option<u32>>,
    failing_paths: HashSet<String>,
    unkillable: HashSet<u32>,
    /// Reported start times; pids without one report none.
    start_times: HashMap<u32, DateTime<Utc>>,
    launched: Vec<String>,
    terminated: Vec<u32>,
}

/// Simulated process table serving as both launcher and inspector.
#[derive(Default)]
pub struct FakeOs {
    state: Mutex<OsState>,
}

impl FakeOs {
    pub fn new() -> Self {
        let os = Self::default();
        os.lock().next_pid = 4000;
        os
    }

    pub fn fail_launch(&self, path: &str) {
        self.lock().failing_paths.insert(path.to_string());
    }

    pub fn spawn_child(&self, parent: u32) -> u32 {
        let mut state = self.lock();
        state.next_pid += 1;
        let pid = state.next_pid;
        state.alive.insert(pid, Some(parent));
        pid
    }

    /// The process exits on its own; its children are reparented away.
    pub fn exit(&self, pid: u32) {
        let mut state = self.lock();
        state.alive.remove(&pid);
        for parent in state.alive.values_mut() {
            if *parent == Some(pid) {
                *parent = None;
            }
        }
    }

    /// An unrelated process now holds `pid`, started at `started_at`.
    pub fn reuse_pid(&self, pid: u32, started_at: DateTime<Utc>) {
        let mut state = self.lock();
        state.alive.insert(pid, None);
        state.start_times.insert(pid, started_at);
    }

    pub fn make_unkillable(&self, pid: u32) {
        self.lock().unkillable.insert(pid);
    }

    pub fn launched(&self) -> Vec<String> {
        self.lock().launched.clone()
    }

    pub fn terminated(&self) -> Vec<u32> {
        self.lock().terminated.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, OsState> {
        self.state.lock().expect("os lock poisoned")
    }
}

impl ProcessLauncher for FakeOs {
    fn launch(&self, path: &str) -> Result<u32> {
        let mut state = self.lock();
        state.launched.push(path.to_string());
        if state.failing_paths.contains(path) {
            return Err(QuickStartError::Launch {
                path: path.to_string(),
                message: "no application registered".into(),
            });
        }
        state.next_pid += 1;
        let pid = state.next_pid;
        state.alive.insert(pid, None);
        Ok(pid)
    }
}

impl ProcessInspector for FakeOs {
    fn exists(&self, pid: u32) -> bool {
        self.lock().alive.contains_key(&pid)
    }

    fn start_time(&self, pid: u32) -> Option<DateTime<Utc>> {
        let state = self.lock();
        state.alive.contains_key(&pid).then(|| state.start_times.get(&pid).copied()).flatten()
    }

    fn descendants(&self, pid: u32) -> Vec<u32> {
        let state = self.lock();
        let mut found = Vec::new();
        let mut queue = VecDeque::from([pid]);
        while let Some(parent) = queue.pop_front() {
            let mut children: Vec<u32> = state
                .alive
                .iter()
                .filter(|(_, p)| **p == Some(parent))
                .map(|(child, _)| *child)
                .collect();
            children.sort_unstable();
            for child in children {
                found.push(child);
                queue.push_back(child);
            }
        }
        found
    }

    fn terminate(&self, pid: u32) -> Result<()> {
        let mut state = self.lock();
        if state.unkillable.contains(&pid) {
            return Err(QuickStartError::Termination { pid, message: "operation not permitted".into() });
        }
        state.alive.remove(&pid);
        state.terminated.push(pid);
        Ok(())
    }
}

/// Wired-up services sharing one fake store, OS and clock.
pub struct Harness {
    pub clock: Arc<MockClock>,
    pub repository: Arc<InMemoryRepository>,
    pub os: Arc<FakeOs>,
    pub service: WorkspaceService,
    pub coordinator: LifecycleCoordinator,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_accounting(UsageAccounting::ProcessTime)
    }

    pub fn with_accounting(accounting: UsageAccounting) -> Self {
        let clock = Arc::new(MockClock::new());
        let repository = Arc::new(InMemoryRepository::new(Arc::clone(&clock)));
        let os = Arc::new(FakeOs::new());
        let service = WorkspaceService::new(repository.clone());
        let coordinator = LifecycleCoordinator::new(repository.clone(), os.clone(), os.clone())
            .with_clock(clock.clone())
            .with_accounting(accounting);
        Self { clock, repository, os, service, coordinator }
    }

    /// Create `name` with the given files.
    pub fn workspace(&self, name: &str, files: &[&str]) -> WorkspaceId {
        let files: Vec<String> = files.iter().map(|file| file.to_string()).collect();
        self.service.create(name, &files).expect("workspace creation should succeed")
    }
}
