//! Interactive questions asked by `build` and `delete`.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use quickstart_domain::{QuickStartError, Result};

/// Text and yes/no questions, kept behind a trait so commands can be driven
/// by scripted answers.
pub trait Prompter {
    fn text(&self, prompt: &str) -> Result<String>;

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Terminal prompts.
#[derive(Default)]
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&self, prompt: &str) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }
}

fn prompt_error(err: dialoguer::Error) -> QuickStartError {
    QuickStartError::Platform(format!("prompt failed: {err}"))
}
