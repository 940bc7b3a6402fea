//! Terminal prompt for choosing a file.

use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use quickstart_core::FilePicker;
use quickstart_domain::{QuickStartError, Result};
use tracing::warn;

/// Asks for a path on the terminal.
pub struct PromptFilePicker {
    prompt: String,
}

impl Default for PromptFilePicker {
    fn default() -> Self {
        Self { prompt: "File path (leave empty to finish)".to_string() }
    }
}

impl PromptFilePicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into() }
    }
}

impl FilePicker for PromptFilePicker {
    fn pick_file(&self) -> Result<Option<PathBuf>> {
        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(&self.prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|err| QuickStartError::Platform(format!("file prompt failed: {err}")))?;

        Ok(normalize_selection(&answer))
    }
}

/// Trim the answer; an empty answer means nothing was chosen. Paths that do
/// not exist are accepted with a warning since the file may be created
/// before the workspace is started.
pub fn normalize_selection(answer: &str) -> Option<PathBuf> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return None;
    }

    let path = PathBuf::from(trimmed);
    if !path.exists() {
        warn!(path = %path.display(), "picker.path_missing");
    }
    Some(path)
}
