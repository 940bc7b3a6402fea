//! Opens files with the platform's default handler.

use std::process::{Command, Stdio};

use quickstart_core::ProcessLauncher;
use quickstart_domain::{LauncherConfig, QuickStartError, Result};
use tracing::debug;

/// `DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP`: no console inherited from
/// the caller, and Ctrl-C/Ctrl-Break in that console do not reach the child.
#[cfg(windows)]
const WINDOWS_DETACH_FLAGS: u32 = 0x0000_0008 | 0x0000_0200;

/// Spawns the default handler (or a configured opener) for each file.
///
/// The spawned process is detached: it gets its own process group on unix, is
/// started without the caller's console on Windows, inherits no stdio, and is
/// never waited on. The pid reported is that of
/// the spawned program, which for `xdg-open`-style helpers may be a
/// short-lived wrapper.
#[derive(Debug, Clone, Default)]
pub struct DefaultHandlerLauncher {
    opener: Option<String>,
}

impl DefaultHandlerLauncher {
    /// Launcher using the platform default handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Launcher running `opener` (program plus optional arguments, split on
    /// whitespace) with the file path appended.
    pub fn with_opener(opener: impl Into<String>) -> Self {
        Self { opener: Some(opener.into()) }
    }

    pub fn from_config(config: &LauncherConfig) -> Self {
        match config.opener.as_deref().map(str::trim).filter(|opener| !opener.is_empty()) {
            Some(opener) => Self::with_opener(opener),
            None => Self::new(),
        }
    }

    fn command(&self, path: &str) -> Command {
        match &self.opener {
            Some(opener) => {
                let mut parts = opener.split_whitespace();
                // An empty opener fails at spawn time like any missing program.
                let program = parts.next().unwrap_or(opener.as_str());
                let mut command = Command::new(program);
                command.args(parts).arg(path);
                command
            }
            None => default_handler_command(path),
        }
    }
}

#[cfg(target_os = "macos")]
fn default_handler_command(path: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(windows)]
fn default_handler_command(path: &str) -> Command {
    let mut command = Command::new("cmd");
    // The empty string is the window title `start` expects before the path.
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(all(unix, not(target_os = "macos")))]
fn default_handler_command(path: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

impl ProcessLauncher for DefaultHandlerLauncher {
    fn launch(&self, path: &str) -> Result<u32> {
        let mut command = self.command(path);
        command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());

        detach(&mut command);

        let child = command.spawn().map_err(|err| QuickStartError::Launch {
            path: path.to_string(),
            message: err.to_string(),
        })?;

        let pid = child.id();
        debug!(pid, path, program = ?command.get_program(), "launcher.spawned");
        // Dropping the handle detaches the child.
        drop(child);
        Ok(pid)
    }
}

#[cfg(unix)]
fn detach(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(windows)]
fn detach(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    command.creation_flags(WINDOWS_DETACH_FLAGS);
}

#[cfg(not(any(unix, windows)))]
fn detach(_command: &mut Command) {}
