//! Application constants

/// Binary and directory name used for per-user data and config locations.
pub const APP_DIR_NAME: &str = "quickstart";

/// Database file name used when no path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "quickstart.db";

/// Base name of searched configuration files (`quickstart.toml`, `quickstart.json`).
pub const CONFIG_FILE_STEM: &str = "quickstart";

pub const DEFAULT_POOL_SIZE: u32 = 4;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Placeholder rendered for timestamps that were never set.
pub const MISSING_TIMESTAMP: &str = "-";
