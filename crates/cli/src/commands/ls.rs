use std::io::Write;

use quickstart_domain::WorkspaceSummary;

use super::CommandStatus;
use crate::context::AppContext;
use crate::utils::render::{
    format_duration, format_optional_timestamp, format_timestamp, Align, Table,
};

pub fn run(ctx: &AppContext, json: bool, out: &mut dyn Write) -> anyhow::Result<CommandStatus> {
    let workspaces = ctx.workspaces.list()?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &workspaces)?;
        writeln!(out)?;
        return Ok(CommandStatus::Success);
    }

    if workspaces.is_empty() {
        writeln!(out, "No workspaces found.")?;
        return Ok(CommandStatus::Success);
    }

    write!(out, "{}", workspace_table(&workspaces).render())?;
    Ok(CommandStatus::Success)
}

pub fn workspace_table(workspaces: &[WorkspaceSummary]) -> Table {
    let mut table = Table::new(&[
        ("Name", Align::Left),
        ("Status", Align::Left),
        ("Files", Align::Right),
        ("Created", Align::Left),
        ("Last Activated", Align::Left),
        ("Count", Align::Right),
        ("Usage", Align::Right),
    ]);

    for workspace in workspaces {
        table.push_row(vec![
            workspace.name.clone(),
            workspace.status.to_string(),
            workspace.file_count.to_string(),
            format_timestamp(workspace.created_at),
            format_optional_timestamp(workspace.last_activated_at),
            workspace.activate_count.to_string(),
            format_duration(workspace.total_usage_seconds),
        ]);
    }

    table
}
