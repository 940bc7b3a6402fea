//! Configuration loading and management
//!
//! This module provides utilities for loading application configuration
//! from files and environment variables.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    default_database_path, load, load_from_env, load_from_file, find_config_file,
    with_resolved_database_path,
};
