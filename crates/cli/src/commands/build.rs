use std::fs;
use std::io::Write;
use std::path::PathBuf;

use quickstart_domain::{validate_workspace_name, QuickStartError};
use tracing::debug;

use super::CommandStatus;
use crate::context::AppContext;
use crate::utils::prompt::Prompter;

const NAME_PROMPT: &str = "Enter workspace name (unique, no spaces)";

/// Interactive creation: a name, then files until the user declines to add
/// another. Choosing no file at all offers to abort.
pub fn run(
    ctx: &AppContext,
    name: Option<&str>,
    prompter: &dyn Prompter,
    out: &mut dyn Write,
) -> anyhow::Result<CommandStatus> {
    let name = match name {
        Some(name) => name.trim().to_string(),
        None => prompter.text(NAME_PROMPT)?.trim().to_string(),
    };
    validate_workspace_name(&name)?;

    // Duplicate names fail before any file is picked.
    if ctx.repository.find_workspace(&name)?.is_some() {
        return Err(QuickStartError::DuplicateName(name).into());
    }

    let mut files: Vec<String> = Vec::new();
    writeln!(out, "Please select the first file for this workspace.")?;
    loop {
        if !files.is_empty() && !prompter.confirm("Do you want to add another file?", false)? {
            break;
        }

        match ctx.picker.pick_file()? {
            Some(path) => {
                let path = absolute(path);
                writeln!(out, "Added: {}", path.display())?;
                files.push(path.to_string_lossy().into_owned());
            }
            None => {
                writeln!(out, "No file selected.")?;
                if files.is_empty() && prompter.confirm("No files selected. Abort creation?", true)? {
                    writeln!(out, "Workspace creation aborted.")?;
                    return Ok(CommandStatus::Success);
                }
            }
        }
    }

    ctx.workspaces.create(&name, &files)?;
    debug!(workspace = %name, files = files.len(), "build.completed");
    writeln!(out, "Workspace '{name}' created with {} file(s).", files.len())?;
    Ok(CommandStatus::Success)
}

/// Stored paths are launched later from any directory, so relative picks
/// are resolved now. Paths that do not exist yet are kept as given.
fn absolute(path: PathBuf) -> PathBuf {
    fs::canonicalize(&path).unwrap_or(path)
}
