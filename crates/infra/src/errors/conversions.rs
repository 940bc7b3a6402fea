//! Conversions from external infrastructure errors into domain errors.

use quickstart_common::error::{ErrorClassification, ErrorSeverity};
use quickstart_common::storage::StorageError;
use quickstart_domain::QuickStartError;
use rusqlite::Error as SqlError;
use tracing::{error, info, warn};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub QuickStartError);

impl From<InfraError> for QuickStartError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<QuickStartError> for InfraError {
    fn from(value: QuickStartError) -> Self {
        InfraError(value)
    }
}

/// Shared by the `From` impls below so nested errors (a `rusqlite::Error`
/// inside a `StorageError`) map the same way as bare ones.
trait IntoQuickStartError {
    fn into_quickstart(self) -> QuickStartError;
}

/// SQLite extended result codes for `UNIQUE` and `PRIMARY KEY` violations.
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;

/// Whether `err` is a uniqueness violation, so callers can report the
/// offending value instead of a generic storage failure.
pub fn is_unique_violation(err: &StorageError) -> bool {
    match err {
        StorageError::Rusqlite(SqlError::SqliteFailure(ffi, _)) => matches!(
            ffi.extended_code,
            SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY
        ),
        _ => false,
    }
}

/// Log a failed storage operation at the level its classification calls for
/// and return that severity. Critical failures mean the database file itself
/// is unusable.
pub fn log_storage_failure(operation: &'static str, err: &StorageError) -> ErrorSeverity {
    let severity = err.severity();
    let retryable = err.is_retryable();
    if err.is_critical() {
        error!(operation, %severity, retryable, error = %err, "storage.failure");
    } else if severity == ErrorSeverity::Error {
        warn!(operation, %severity, retryable, error = %err, "storage.failure");
    } else {
        info!(operation, %severity, retryable, error = %err, "storage.failure");
    }
    severity
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → QuickStartError */
/* -------------------------------------------------------------------------- */

impl IntoQuickStartError for SqlError {
    fn into_quickstart(self) -> QuickStartError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        QuickStartError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        QuickStartError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_UNIQUE) => {
                        QuickStartError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_FOREIGNKEY) => {
                        QuickStartError::Database("foreign key constraint violation".into())
                    }
                    (ErrorCode::NotADatabase, _) => QuickStartError::Database(
                        "file is not a QuickStart database".into(),
                    ),
                    _ => QuickStartError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => QuickStartError::Database("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                QuickStartError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                QuickStartError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                QuickStartError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidPath(path) => QuickStartError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => QuickStartError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_quickstart())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → QuickStartError */
/* -------------------------------------------------------------------------- */

impl IntoQuickStartError for StorageError {
    fn into_quickstart(self) -> QuickStartError {
        match self {
            StorageError::Rusqlite(err) => err.into_quickstart(),
            StorageError::InvalidConfig(message) => QuickStartError::Config(message),
            other => QuickStartError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_quickstart())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → QuickStartError */
/* -------------------------------------------------------------------------- */

impl IntoQuickStartError for std::io::Error {
    fn into_quickstart(self) -> QuickStartError {
        QuickStartError::Platform(self.to_string())
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_quickstart())
    }
}
