//! # QuickStart CLI
//!
//! The `qs` command line front end.
//!
//! This crate contains:
//! - Argument parsing (`clap`)
//! - Application context (dependency injection)
//! - One handler per subcommand
//! - Logging setup, terminal prompts and table rendering
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the platform adapters into the core services once per invocation

pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

use std::io::Write;

pub use cli::{Args, Command};
pub use commands::{dispatch, CommandStatus};
pub use context::AppContext;
use quickstart_infra::config;
use tracing::{debug, error, info};
use utils::logging::{error_label, init_tracing};
use utils::prompt::DialoguerPrompter;

/// Bootstrap and run one invocation: configuration, logging, context, then
/// the subcommand. Output goes to `out`.
pub fn run(args: &Args, out: &mut dyn Write) -> anyhow::Result<CommandStatus> {
    let dotenv = dotenvy::dotenv();

    let config = config::load(args.config.clone())?;
    // A second call (tests running in one process) keeps the first subscriber.
    if let Err(err) = init_tracing(&config.logging, args.verbose) {
        debug!(error = %err, "tracing already initialised");
    }
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(err) => debug!(error = %err, "no .env loaded"),
    }

    let ctx = AppContext::new(config)?;
    let command = args.command.name();
    let result = dispatch(&ctx, &args.command, &DialoguerPrompter::new(), out);

    match &result {
        Ok(status) => info!(command, ?status, "command.completed"),
        Err(err) => match err.downcast_ref::<quickstart_domain::QuickStartError>() {
            Some(domain) => {
                error!(command, kind = error_label(domain), error = %domain, "command.failed");
            }
            None => error!(command, error = %err, "command.failed"),
        },
    }
    result
}
