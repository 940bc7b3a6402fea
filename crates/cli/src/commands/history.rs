use std::io::Write;

use super::CommandStatus;
use crate::context::AppContext;
use crate::utils::render::{format_duration, format_timestamp, Align, Table};

pub fn run(
    ctx: &AppContext,
    name: &str,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<CommandStatus> {
    let sessions = ctx.workspaces.history(name)?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &sessions)?;
        writeln!(out)?;
        return Ok(CommandStatus::Success);
    }

    if sessions.is_empty() {
        writeln!(out, "No usage recorded for '{name}'.")?;
        return Ok(CommandStatus::Success);
    }

    let mut table =
        Table::new(&[("Started", Align::Left), ("Ended", Align::Left), ("Duration", Align::Right)]);
    for session in &sessions {
        table.push_row(vec![
            format_timestamp(session.started_at),
            format_timestamp(session.ended_at),
            format_duration(session.duration_seconds),
        ]);
    }
    write!(out, "{}", table.render())?;

    let total: i64 = sessions.iter().map(|session| session.duration_seconds).sum();
    writeln!(out, "{} session(s), {} total", sessions.len(), format_duration(total))?;
    Ok(CommandStatus::Success)
}
