//! # QuickStart Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the workspace store, process control, file picking
//!   and time
//! - The workspace catalogue service (create, list, delete, history)
//! - The process lifecycle coordinator (start, stop) and usage accounting
//!
//! ## Architecture Principles
//! - Only depends on `quickstart-domain`
//! - No database, process or terminal code
//! - All external dependencies via traits

pub mod lifecycle;
pub mod workspace;

// Re-export specific items to avoid ambiguity
pub use lifecycle::ports::{Clock, ProcessInspector, ProcessLauncher, SystemClock};
pub use lifecycle::LifecycleCoordinator;
pub use workspace::ports::{FilePicker, WorkspaceRepository};
pub use workspace::WorkspaceService;
