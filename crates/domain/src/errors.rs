//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for QuickStart
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum QuickStartError {
    #[error("Workspace '{0}' already exists")]
    DuplicateName(String),

    #[error("Workspace '{0}' not found")]
    NotFound(String),

    #[error("Failed to launch '{path}': {message}")]
    Launch { path: String, message: String },

    #[error("Failed to terminate process {pid}: {message}")]
    Termination { pid: u32, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuickStartError {
    /// Storage failures abort the running operation; everything else is
    /// either a user-facing rejection or a per-item failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Internal(_))
    }
}

/// Result type alias for QuickStart operations
pub type Result<T> = std::result::Result<T, QuickStartError>;
