//! Database implementations

pub mod manager;
pub mod workspace_repository;

pub use manager::*;
pub use workspace_repository::*;
