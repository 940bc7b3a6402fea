//! Error classification shared by QuickStart crates
//!
//! Layer errors implement [`ErrorClassification`] so failures are logged at a
//! level matching what went wrong, whether it came from the pool, a single
//! statement or a broken database file.

use std::fmt;

pub trait ErrorClassification {
    /// Another attempt at the same operation may succeed.
    fn is_retryable(&self) -> bool;

    fn severity(&self) -> ErrorSeverity;

    /// The store can no longer be trusted (corrupt file, not a database).
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl ErrorSeverity {
    /// Level name as printed in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
