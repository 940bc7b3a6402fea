//! # QuickStart Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The SQLite workspace store and its connection manager
//! - Configuration loading (files, environment, defaults)
//! - Platform adapters for launching, inspecting and terminating processes
//! - The terminal file picker
//!
//! ## Architecture
//! - Implements traits defined in `quickstart-core`
//! - Depends on `quickstart-common` storage primitives
//! - Contains all "impure" code (I/O, OS process APIs)

pub mod config;
pub mod database;
pub mod errors;
pub mod platform;

// Re-export commonly used items
pub use database::*;
pub use errors::InfraError;
pub use platform::*;
