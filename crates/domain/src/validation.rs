//! Workspace name rules

use crate::errors::{QuickStartError, Result};

/// Names are used as single CLI arguments, so they must be non-empty and
/// contain no whitespace.
pub fn validate_workspace_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(QuickStartError::InvalidInput("workspace name cannot be empty".into()));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(QuickStartError::InvalidInput(format!(
            "workspace name '{name}' must not contain spaces"
        )));
    }
    Ok(())
}
