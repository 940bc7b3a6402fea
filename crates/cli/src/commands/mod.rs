//! `qs` subcommand handlers
//!
//! Handlers write their human-readable output to the supplied writer and
//! return an error for anything that aborts the command. Partial failures
//! (some files not opened, some processes not stopped) are reported through
//! [`CommandStatus::Failed`].

pub mod build;
pub mod delete;
pub mod history;
pub mod ls;
pub mod start;
pub mod stop;

use std::io::Write;

use crate::cli::Command;
use crate::context::AppContext;
use crate::utils::prompt::Prompter;

/// How a command that ran to completion went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failed,
}

impl CommandStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failed => 1,
        }
    }
}

/// Route a parsed subcommand to its handler.
pub fn dispatch(
    ctx: &AppContext,
    command: &Command,
    prompter: &dyn Prompter,
    out: &mut dyn Write,
) -> anyhow::Result<CommandStatus> {
    match command {
        Command::Ls { json } => ls::run(ctx, *json, out),
        Command::Build { name } => build::run(ctx, name.as_deref(), prompter, out),
        Command::Start { name } => start::run(ctx, name, out),
        Command::Stop { name } => stop::run(ctx, name, out),
        Command::Delete { name, yes } => delete::run(ctx, name, *yes, prompter, out),
        Command::History { name, json } => history::run(ctx, name, *json, out),
    }
}
