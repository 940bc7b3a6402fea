use std::io::Write;

use super::CommandStatus;
use crate::context::AppContext;

pub fn run(ctx: &AppContext, name: &str, out: &mut dyn Write) -> anyhow::Result<CommandStatus> {
    let report = ctx.lifecycle.start(name)?;

    if report.files_total == 0 {
        writeln!(out, "Workspace '{name}' has no files to open.")?;
        return Ok(CommandStatus::Failed);
    }

    for process in &report.launched {
        writeln!(out, "Opened {} (pid {})", process.file_path, process.pid)?;
    }
    for failure in &report.failures {
        writeln!(out, "Failed to open {}: {}", failure.path, failure.message)?;
    }
    writeln!(
        out,
        "Started '{name}': {} of {} file(s) opened.",
        report.launched.len(),
        report.files_total
    )?;

    Ok(if report.success() { CommandStatus::Success } else { CommandStatus::Failed })
}
