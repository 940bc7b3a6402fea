//! # QuickStart Domain
//!
//! Business domain types for QuickStart.
//!
//! This crate contains:
//! - Workspace, process ledger and usage session types
//! - Start/stop report types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and name validation
//!
//! ## Architecture
//! - No dependencies on other QuickStart crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use validation::validate_workspace_name;
