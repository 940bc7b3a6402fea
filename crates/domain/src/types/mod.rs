//! Domain types and models

pub mod process;
pub mod report;
pub mod workspace;

pub use process::{elapsed_seconds, ActiveProcess, NewUsageSession, UsageSession};
pub use report::{LaunchFailure, ProcessOutcome, StartReport, StopReport, TerminationOutcome};
pub use workspace::{Workspace, WorkspaceId, WorkspaceStatus, WorkspaceSummary};
