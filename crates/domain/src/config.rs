//! Configuration management

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOG_LEVEL, DEFAULT_POOL_SIZE};
use crate::errors::QuickStartError;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub launcher: LauncherConfig,
    pub usage: UsageConfig,
    pub logging: LoggingConfig,
}

/// Database configuration
///
/// An empty `path` means "not configured"; the loader substitutes the
/// per-user data location before the config is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: String::new(), pool_size: DEFAULT_POOL_SIZE }
    }
}

/// How files are opened
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Program invoked with the file path as its only argument. `None` uses
    /// the platform's default handler.
    pub opener: Option<String>,
}

/// Usage accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    pub accounting: UsageAccounting,
}

/// How elapsed time of concurrently running files is credited to a
/// workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageAccounting {
    /// Every process contributes its own elapsed time; overlapping files
    /// add up.
    #[default]
    ProcessTime,
    /// Overlapping intervals within one stop are credited once, so the
    /// total equals the wall-clock span the workspace was active.
    WallClock,
}

impl fmt::Display for UsageAccounting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProcessTime => write!(f, "process_time"),
            Self::WallClock => write!(f, "wall_clock"),
        }
    }
}

impl FromStr for UsageAccounting {
    type Err = QuickStartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "process_time" | "process" => Ok(Self::ProcessTime),
            "wall_clock" | "wall" => Ok(Self::WallClock),
            other => Err(QuickStartError::Config(format!("Unknown usage accounting mode: {other}"))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}
