//! Process table access through `sysinfo`.

use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use quickstart_core::ProcessInspector;
use quickstart_domain::{QuickStartError, Result};
use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, Signal, System};
use tracing::debug;

const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(1500);
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Inspects and terminates OS processes.
///
/// Termination sends `SIGTERM` (or the platform's closest equivalent) and
/// escalates to a forced kill if the process is still alive after the grace
/// period. Zombies count as exited.
#[derive(Debug, Clone)]
pub struct SysinfoProcessInspector {
    grace_period: Duration,
}

impl Default for SysinfoProcessInspector {
    fn default() -> Self {
        Self { grace_period: DEFAULT_GRACE_PERIOD }
    }
}

impl SysinfoProcessInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long to wait for a polite exit before forcing one.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    fn wait_for_exit(&self, pid: u32) -> bool {
        let deadline = Instant::now() + self.grace_period;
        loop {
            if !self.exists(pid) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(EXIT_POLL_INTERVAL);
        }
    }
}

fn refreshed(pid: u32) -> System {
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]), true);
    system
}

fn is_running(system: &System, pid: u32) -> bool {
    system
        .process(Pid::from_u32(pid))
        .is_some_and(|process| !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead))
}

/// Transitive children of `root`, parents before children.
pub fn collect_descendants(parents: &HashMap<u32, Vec<u32>>, root: u32) -> Vec<u32> {
    let mut found = Vec::new();
    let mut frontier = vec![root];
    while !frontier.is_empty() {
        let mut next = Vec::new();
        for parent in frontier {
            if let Some(children) = parents.get(&parent) {
                for &child in children {
                    if child != root && !found.contains(&child) {
                        found.push(child);
                        next.push(child);
                    }
                }
            }
        }
        frontier = next;
    }
    found
}

impl ProcessInspector for SysinfoProcessInspector {
    fn exists(&self, pid: u32) -> bool {
        is_running(&refreshed(pid), pid)
    }

    fn start_time(&self, pid: u32) -> Option<DateTime<Utc>> {
        let system = refreshed(pid);
        if !is_running(&system, pid) {
            return None;
        }
        let seconds = system.process(Pid::from_u32(pid))?.start_time();
        DateTime::from_timestamp(i64::try_from(seconds).ok()?, 0)
    }

    fn descendants(&self, pid: u32) -> Vec<u32> {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
        for (child, process) in system.processes() {
            let Some(parent) = process.parent() else {
                continue;
            };
            children.entry(parent.as_u32()).or_default().push(child.as_u32());
        }
        for siblings in children.values_mut() {
            siblings.sort_unstable();
        }

        collect_descendants(&children, pid)
    }

    fn terminate(&self, pid: u32) -> Result<()> {
        let system = refreshed(pid);
        let Some(process) = system.process(Pid::from_u32(pid)) else {
            return Ok(());
        };
        if !is_running(&system, pid) {
            return Ok(());
        }

        match process.kill_with(Signal::Term) {
            Some(true) => {
                if self.wait_for_exit(pid) {
                    debug!(pid, "inspector.terminated");
                    return Ok(());
                }
                debug!(pid, grace_ms = self.grace_period.as_millis() as u64, "inspector.escalating_to_kill");
            }
            Some(false) => debug!(pid, "inspector.term_not_delivered"),
            None => debug!(pid, "inspector.term_unsupported"),
        }

        if process.kill() && self.wait_for_exit(pid) {
            debug!(pid, "inspector.killed");
            return Ok(());
        }

        Err(QuickStartError::Termination {
            pid,
            message: "process is still running after TERM/KILL".into(),
        })
    }
}
