//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "qs", version, about = "QuickStart: manage and launch your workspaces")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List all workspaces
    Ls {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new workspace interactively
    Build {
        /// Workspace name; prompted for when omitted
        name: Option<String>,
    },

    /// Open every file of a workspace
    Start { name: String },

    /// Terminate the processes a workspace started and record usage
    Stop { name: String },

    /// Delete a workspace and everything recorded for it
    Delete {
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show recorded usage sessions of a workspace
    History {
        name: String,

        /// Print the sessions as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    /// Stable name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ls { .. } => "ls",
            Self::Build { .. } => "build",
            Self::Start { .. } => "start",
            Self::Stop { .. } => "stop",
            Self::Delete { .. } => "delete",
            Self::History { .. } => "history",
        }
    }
}
