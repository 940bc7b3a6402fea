use quickstart_domain::{LoggingConfig, QuickStartError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is unset.
///
/// `--verbose` raises the configured level to `debug`.
pub fn default_directive(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config.level.clone()
    }
}

/// Install the global subscriber. Output always goes to stderr so command
/// output on stdout stays clean.
///
/// # Errors
/// Returns `QuickStartError::Config` for an unparsable level and
/// `QuickStartError::Internal` if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directive = default_directive(config, verbose);
            EnvFilter::try_new(&directive).map_err(|err| {
                QuickStartError::Config(format!("invalid log level '{directive}': {err}"))
            })?
        }
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = if config.json {
        registry
            .with(fmt::layer().with_ansi(false).json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry.with(fmt::layer().compact().with_writer(std::io::stderr)).try_init()
    };

    installed
        .map_err(|err| QuickStartError::Internal(format!("Failed to initialize tracing: {err}")))
}

/// Convert a `QuickStartError` into a stable label for log fields.
#[inline]
pub fn error_label(error: &QuickStartError) -> &'static str {
    match error {
        QuickStartError::DuplicateName(_) => "duplicate_name",
        QuickStartError::NotFound(_) => "not_found",
        QuickStartError::Launch { .. } => "launch",
        QuickStartError::Termination { .. } => "termination",
        QuickStartError::Database(_) => "database",
        QuickStartError::Config(_) => "config",
        QuickStartError::Platform(_) => "platform",
        QuickStartError::InvalidInput(_) => "invalid_input",
        QuickStartError::Internal(_) => "internal",
    }
}
