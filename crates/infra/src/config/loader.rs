//! Configuration loader
//!
//! Loads application configuration from an explicit file, environment
//! variables, or a config file found in a standard location, in that order, and falls back to
//! defaults when none is present.
//!
//! ## Environment Variables
//! - `QUICKSTART_DB_PATH`: Database file path (required for env mode)
//! - `QUICKSTART_DB_POOL_SIZE`: Connection pool size
//! - `QUICKSTART_OPENER`: Program used to open files
//! - `QUICKSTART_USAGE_ACCOUNTING`: `process_time` or `wall_clock`
//! - `QUICKSTART_LOG_LEVEL`: Default log filter
//! - `QUICKSTART_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./quickstart.toml` or `./quickstart.json` (current working directory)
//! 2. Next to the executable
//! 3. `<config dir>/quickstart/config.toml` or `config.json`

use std::path::{Path, PathBuf};

use quickstart_domain::constants::{APP_DIR_NAME, CONFIG_FILE_STEM, DEFAULT_DB_FILE_NAME};
use quickstart_domain::{
    Config, DatabaseConfig, LauncherConfig, LoggingConfig, QuickStartError, Result, UsageAccounting,
    UsageConfig,
};

const ENV_DB_PATH: &str = "QUICKSTART_DB_PATH";
const ENV_DB_POOL_SIZE: &str = "QUICKSTART_DB_POOL_SIZE";
const ENV_OPENER: &str = "QUICKSTART_OPENER";
const ENV_USAGE_ACCOUNTING: &str = "QUICKSTART_USAGE_ACCOUNTING";
const ENV_LOG_LEVEL: &str = "QUICKSTART_LOG_LEVEL";
const ENV_LOG_JSON: &str = "QUICKSTART_LOG_JSON";

/// Load configuration with automatic fallback strategy
///
/// An explicit path must exist and parse. Otherwise environment variables
/// are tried, then the standard file locations, then defaults. The database path is always
/// resolved before returning.
///
/// # Errors
/// Returns `QuickStartError::Config` if the explicit file is missing or any
/// selected source is malformed.
pub fn load(explicit: Option<PathBuf>) -> Result<Config> {
    let config = match explicit {
        Some(path) => load_from_file(Some(path))?,
        None => match load_from_env() {
            Ok(config) => {
                tracing::debug!("Configuration loaded from environment variables");
                config
            }
            Err(e) => {
                tracing::debug!(error = ?e, "Failed to load from environment, trying file");
                match find_config_file() {
                    Some(path) => load_from_file(Some(path))?,
                    None => {
                        tracing::debug!("No config file found, using defaults");
                        Config::default()
                    }
                }
            }
        },
    };

    Ok(with_resolved_database_path(config))
}

/// Load configuration from environment variables
///
/// Only `QUICKSTART_DB_PATH` is required; every other variable falls back to
/// its default.
///
/// # Errors
/// Returns `QuickStartError::Config` if the required variable is missing or
/// any variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var(ENV_DB_PATH)?;
    let defaults = Config::default();

    let pool_size = match std::env::var(ENV_DB_POOL_SIZE) {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|e| QuickStartError::Config(format!("Invalid pool size: {e}")))?,
        Err(_) => defaults.database.pool_size,
    };

    let accounting = match std::env::var(ENV_USAGE_ACCOUNTING) {
        Ok(raw) => raw.parse::<UsageAccounting>()?,
        Err(_) => UsageAccounting::default(),
    };

    let opener = std::env::var(ENV_OPENER).ok().filter(|opener| !opener.trim().is_empty());
    let level = std::env::var(ENV_LOG_LEVEL).unwrap_or(defaults.logging.level);

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size },
        launcher: LauncherConfig { opener },
        usage: UsageConfig { accounting },
        logging: LoggingConfig { level, json: env_bool(ENV_LOG_JSON, false) },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations.
///
/// # Errors
/// Returns `QuickStartError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(QuickStartError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            QuickStartError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::debug!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| QuickStartError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| QuickStartError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| QuickStartError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(QuickStartError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Search the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let exe_dir =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf));
    let config_dir = dirs::config_dir();

    config_candidates(cwd.as_deref(), exe_dir.as_deref(), config_dir.as_deref())
        .into_iter()
        .find(|path| path.exists())
}

fn config_candidates(
    cwd: Option<&Path>,
    exe_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for dir in [cwd, exe_dir].into_iter().flatten() {
        candidates.push(dir.join(format!("{CONFIG_FILE_STEM}.toml")));
        candidates.push(dir.join(format!("{CONFIG_FILE_STEM}.json")));
    }

    if let Some(dir) = config_dir {
        let app_dir = dir.join(APP_DIR_NAME);
        candidates.push(app_dir.join("config.toml"));
        candidates.push(app_dir.join("config.json"));
    }

    candidates
}

/// Per-user database location, or `./quickstart.db` when the platform has
/// no data directory.
pub fn default_database_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join(APP_DIR_NAME).join(DEFAULT_DB_FILE_NAME),
        None => PathBuf::from(DEFAULT_DB_FILE_NAME),
    }
}

/// Fill in the database path if the chosen source left it unset.
pub fn with_resolved_database_path(mut config: Config) -> Config {
    if config.database.path.trim().is_empty() {
        config.database.path = default_database_path().to_string_lossy().into_owned();
    }
    config
}

/// Get required environment variable
///
/// # Errors
/// Returns `QuickStartError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        QuickStartError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
