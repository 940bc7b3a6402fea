//! Workspace catalogue
//!
//! Ports for the persistent store and the interactive file picker, plus the
//! service behind `ls`, `build`, `delete` and `history`.

pub mod ports;
pub mod service;

pub use ports::{FilePicker, WorkspaceRepository};
pub use service::WorkspaceService;
