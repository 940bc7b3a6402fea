use std::io::Write;

use quickstart_domain::QuickStartError;

use super::CommandStatus;
use crate::context::AppContext;
use crate::utils::prompt::Prompter;

pub fn run(
    ctx: &AppContext,
    name: &str,
    yes: bool,
    prompter: &dyn Prompter,
    out: &mut dyn Write,
) -> anyhow::Result<CommandStatus> {
    if ctx.repository.find_workspace(name)?.is_none() {
        return Err(QuickStartError::NotFound(name.to_string()).into());
    }

    if ctx.lifecycle.active_workspaces()?.iter().any(|active| active == name) {
        writeln!(
            out,
            "Workspace '{name}' is running; its processes will keep running untracked."
        )?;
    }

    let prompt = format!("Are you sure you want to delete workspace '{name}'?");
    if !yes && !prompter.confirm(&prompt, false)? {
        writeln!(out, "Deletion cancelled.")?;
        return Ok(CommandStatus::Success);
    }

    ctx.workspaces.delete(name)?;
    writeln!(out, "Workspace '{name}' deleted.")?;
    Ok(CommandStatus::Success)
}
