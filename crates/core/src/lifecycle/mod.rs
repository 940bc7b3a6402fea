//! Process lifecycle
//!
//! Launches a workspace's files, tracks the resulting processes in the
//! store, and reconciles them against the OS at stop time.

pub mod accounting;
pub mod coordinator;
pub mod ports;

pub use coordinator::LifecycleCoordinator;
pub use ports::{Clock, ProcessInspector, ProcessLauncher, SystemClock};
