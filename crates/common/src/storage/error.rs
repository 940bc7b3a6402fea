//! Errors raised by the pooled SQLite store

use rusqlite::ErrorCode;
use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};

#[derive(Debug, Error)]
pub enum StorageError {
    /// The pool could not be built or handed out no connection.
    #[error("database unavailable: {0}")]
    Pool(String),

    #[error("no database connection within {0}s")]
    Timeout(u64),

    #[error("invalid storage configuration: {0}")]
    InvalidConfig(String),

    #[error("transaction already finished")]
    TransactionFinished,

    #[error(transparent)]
    Rusqlite(#[from] rusqlite::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Primary SQLite result code, when the failure came from SQLite itself.
    pub fn sqlite_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Rusqlite(err) => err.sqlite_error_code(),
            _ => None,
        }
    }
}

impl ErrorClassification for StorageError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_))
            || matches!(
                self.sqlite_code(),
                Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
            )
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Timeout(_) => ErrorSeverity::Warning,
            Self::Rusqlite(_)
                if matches!(
                    self.sqlite_code(),
                    Some(ErrorCode::DatabaseCorrupt | ErrorCode::NotADatabase)
                ) =>
            {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::Error,
        }
    }
}
