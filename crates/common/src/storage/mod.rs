//! Pooled SQLite storage
//!
//! Connection pooling, per-connection pragmas and scoped transactions. The
//! tables themselves are owned by the infrastructure crate.

pub mod config;
pub mod connection;
pub mod error;
pub mod pool;

pub use config::StorageConfig;
pub use connection::{SqliteConnection, Transaction};
pub use error::{StorageError, StorageResult};
pub use pool::{HealthStatus, SqlitePool};
