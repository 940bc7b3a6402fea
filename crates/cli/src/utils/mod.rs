//! Shared helpers for command handlers

pub mod logging;
pub mod prompt;
pub mod render;
