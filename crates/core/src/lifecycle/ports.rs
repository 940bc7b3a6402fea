//! Port interfaces for process control and time

use chrono::{DateTime, Utc};
use quickstart_domain::Result;

/// Opens a file with an external program and reports the spawned pid.
pub trait ProcessLauncher: Send + Sync {
    /// Launch `path` detached from the caller with no inherited stdio.
    fn launch(&self, path: &str) -> Result<u32>;
}

/// Read-only view of, and termination access to, the OS process table.
pub trait ProcessInspector: Send + Sync {
    /// Whether `pid` names a live (non-zombie) process.
    fn exists(&self, pid: u32) -> bool;

    /// When the live process `pid` was started, if the platform reports it.
    /// Used to tell a tracked process from a later one that reused its pid.
    fn start_time(&self, _pid: u32) -> Option<DateTime<Utc>> {
        None
    }

    /// All transitive children of `pid`, parents before their children.
    fn descendants(&self, pid: u32) -> Vec<u32>;

    /// Ask `pid` to exit, forcing it if the polite request is refused.
    fn terminate(&self, pid: u32) -> Result<()>;
}

/// Source of the current UTC time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
