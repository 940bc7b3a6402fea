//! Fixtures for driving `qs` commands against a temporary database.
#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use quickstart_cli::commands::{dispatch, CommandStatus};
use quickstart_cli::utils::prompt::Prompter;
use quickstart_cli::{AppContext, Command};
use quickstart_common::testing::TempDir;
use quickstart_core::{FilePicker, ProcessInspector, ProcessLauncher};
use quickstart_domain::{Config, QuickStartError, Result};

/// Hands out increasing pids; paths registered with `fail_on` are refused.
pub struct FakeLauncher {
    next_pid: AtomicU32,
    failing: Mutex<HashSet<String>>,
}

impl FakeLauncher {
    pub fn fail_on(&self, path: &str) {
        self.failing.lock().expect("launcher lock poisoned").insert(path.to_string());
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, path: &str) -> Result<u32> {
        if self.failing.lock().expect("launcher lock poisoned").contains(path) {
            return Err(QuickStartError::Launch {
                path: path.to_string(),
                message: "no application is associated with this file".into(),
            });
        }
        Ok(self.next_pid.fetch_add(1, Ordering::SeqCst))
    }
}

/// Every pid is alive until terminated.
#[derive(Default)]
pub struct FakeInspector {
    terminated: Mutex<HashSet<u32>>,
    refuse: AtomicBool,
}

impl FakeInspector {
    /// Every later `terminate` fails as if permission were denied.
    pub fn refuse_termination(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }
}

impl ProcessInspector for FakeInspector {
    fn exists(&self, pid: u32) -> bool {
        !self.terminated.lock().expect("inspector lock poisoned").contains(&pid)
    }

    fn descendants(&self, _pid: u32) -> Vec<u32> {
        Vec::new()
    }

    fn terminate(&self, pid: u32) -> Result<()> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(QuickStartError::Termination { pid, message: "permission denied".into() });
        }
        self.terminated.lock().expect("inspector lock poisoned").insert(pid);
        Ok(())
    }
}

/// Returns queued picks in order. Running out is a test bug.
#[derive(Default)]
pub struct ScriptedPicker {
    picks: Mutex<VecDeque<Option<PathBuf>>>,
}

impl ScriptedPicker {
    pub fn queue(&self, pick: Option<PathBuf>) {
        self.picks.lock().expect("picker lock poisoned").push_back(pick);
    }

    pub fn remaining(&self) -> usize {
        self.picks.lock().expect("picker lock poisoned").len()
    }
}

impl FilePicker for ScriptedPicker {
    fn pick_file(&self) -> Result<Option<PathBuf>> {
        self.picks
            .lock()
            .expect("picker lock poisoned")
            .pop_front()
            .ok_or_else(|| QuickStartError::Platform("no scripted file pick left".into()))
    }
}

/// Answers prompts from queues and remembers what was asked.
#[derive(Default)]
pub struct ScriptedPrompter {
    texts: Mutex<VecDeque<String>>,
    confirms: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn with_text(self, answer: &str) -> Self {
        self.texts.lock().expect("prompter lock poisoned").push_back(answer.to_string());
        self
    }

    pub fn with_confirm(self, answer: bool) -> Self {
        self.confirms.lock().expect("prompter lock poisoned").push_back(answer);
        self
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().expect("prompter lock poisoned").clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&self, prompt: &str) -> Result<String> {
        self.asked.lock().expect("prompter lock poisoned").push(prompt.to_string());
        self.texts
            .lock()
            .expect("prompter lock poisoned")
            .pop_front()
            .ok_or_else(|| QuickStartError::Platform(format!("unexpected prompt: {prompt}")))
    }

    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        self.asked.lock().expect("prompter lock poisoned").push(prompt.to_string());
        self.confirms
            .lock()
            .expect("prompter lock poisoned")
            .pop_front()
            .ok_or_else(|| QuickStartError::Platform(format!("unexpected confirm: {prompt}")))
    }
}

/// A context over a fresh database with fake OS ports.
pub struct TestApp {
    pub ctx: AppContext,
    pub launcher: Arc<FakeLauncher>,
    pub inspector: Arc<FakeInspector>,
    pub picker: Arc<ScriptedPicker>,
    pub dir: TempDir,
}

/// Output and status of one command run.
pub struct Run {
    pub status: anyhow::Result<CommandStatus>,
    pub output: String,
}

impl Run {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, Ok(CommandStatus::Success))
    }

    pub fn domain_error(&self) -> Option<&QuickStartError> {
        self.status.as_ref().err().and_then(|err| err.downcast_ref::<QuickStartError>())
    }
}

impl TestApp {
    pub fn new() -> Self {
        let dir = TempDir::new("cli-test").expect("temp dir should be created");
        let mut config = Config::default();
        config.database.path = dir.path().join("quickstart.db").to_string_lossy().into_owned();

        let launcher =
            Arc::new(FakeLauncher { next_pid: AtomicU32::new(9000), failing: Mutex::default() });
        let inspector = Arc::new(FakeInspector::default());
        let picker = Arc::new(ScriptedPicker::default());
        let ctx =
            AppContext::with_ports(config, launcher.clone(), inspector.clone(), picker.clone())
                .expect("context should open the temp database");

        Self { ctx, launcher, inspector, picker, dir }
    }

    pub fn run_with(&self, command: Command, prompter: &ScriptedPrompter) -> Run {
        let mut buffer = Vec::new();
        let status = dispatch(&self.ctx, &command, prompter, &mut buffer);
        Run { status, output: String::from_utf8(buffer).expect("output should be UTF-8") }
    }

    pub fn run(&self, command: Command) -> Run {
        self.run_with(command, &ScriptedPrompter::default())
    }

    /// Existing files in the temp dir, registered as workspace `name`.
    pub fn workspace(&self, name: &str, files: &[&str]) -> Vec<String> {
        let paths = self.dir.create_files(files).expect("files should be created");
        self.ctx.workspaces.create(name, &paths).expect("workspace should be created");
        paths
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
