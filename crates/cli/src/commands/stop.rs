use std::io::Write;

use quickstart_domain::TerminationOutcome;
use tracing::warn;

use super::CommandStatus;
use crate::context::AppContext;
use crate::utils::render::format_duration;

pub fn run(ctx: &AppContext, name: &str, out: &mut dyn Write) -> anyhow::Result<CommandStatus> {
    let report = ctx.lifecycle.stop(name)?;

    if report.was_idle() {
        writeln!(out, "Workspace '{name}' is not running.")?;
        return Ok(CommandStatus::Success);
    }

    for process in &report.processes {
        let elapsed = format_duration(process.duration_seconds);
        match &process.termination {
            TerminationOutcome::Terminated { descendants: 0 } => {
                writeln!(out, "Stopped {} (pid {}) after {elapsed}", process.file_path, process.pid)?;
            }
            TerminationOutcome::Terminated { descendants } => writeln!(
                out,
                "Stopped {} (pid {}, {descendants} child process(es)) after {elapsed}",
                process.file_path, process.pid
            )?,
            TerminationOutcome::AlreadyExited => writeln!(
                out,
                "{} (pid {}) had already exited; credited {elapsed}",
                process.file_path, process.pid
            )?,
            TerminationOutcome::Failed { message } => writeln!(
                out,
                "Could not stop {} (pid {}): {message}",
                process.file_path, process.pid
            )?,
        }
    }
    writeln!(out, "Recorded {} of usage for '{name}'.", format_duration(report.total_seconds))?;

    // Ledger rows are closed either way; unkillable processes are only
    // reported.
    let failures = report.termination_failures().count();
    if failures > 0 {
        warn!(workspace = name, failures, "command.stop.processes_left_running");
    }
    Ok(CommandStatus::Success)
}
