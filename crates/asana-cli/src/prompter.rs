use std::io;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Editor, Input, Password, Select};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    /// The user aborted the prompt (Ctrl-C or Esc).
    #[error("prompt cancelled")]
    Cancelled,
    #[error("nothing to choose from")]
    NoOptions,
    #[error("prompt failed: {0}")]
    Io(String),
}

/// Interactive questions asked by commands. Swappable so commands can be driven from tests.
pub trait Prompter {
    fn select(&self, message: &str, options: &[String]) -> Result<usize, PromptError>;
    fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError>;
    fn input(&self, message: &str, default: &str) -> Result<String, PromptError>;
    /// Masked input for a personal access token.
    fn token(&self) -> Result<String, PromptError>;
    fn editor(&self, message: &str, prefill: &str) -> Result<String, PromptError>;
}

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
    fn select(&self, message: &str, options: &[String]) -> Result<usize, PromptError> {
        if options.is_empty() {
            return Err(PromptError::NoOptions);
        }
        Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(options)
            .default(0)
            .interact_opt()
            .map_err(from_dialoguer)?
            .ok_or(PromptError::Cancelled)
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError> {
        Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(default)
            .interact_opt()
            .map_err(from_dialoguer)?
            .ok_or(PromptError::Cancelled)
    }

    fn input(&self, message: &str, default: &str) -> Result<String, PromptError> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        input
            .interact_text()
            .map(|value| value.trim().to_string())
            .map_err(from_dialoguer)
    }

    fn token(&self) -> Result<String, PromptError> {
        Password::with_theme(&self.theme)
            .with_prompt("Paste your personal access token")
            .interact()
            .map(|value| value.trim().to_string())
            .map_err(from_dialoguer)
    }

    fn editor(&self, message: &str, prefill: &str) -> Result<String, PromptError> {
        eprintln!("{message}");
        match Editor::new().edit(prefill) {
            Ok(Some(text)) => Ok(text),
            // editor closed without saving
            Ok(None) => Ok(prefill.to_string()),
            Err(err) => Err(PromptError::Io(err.to_string())),
        }
    }
}

fn from_dialoguer(err: dialoguer::Error) -> PromptError {
    match err {
        dialoguer::Error::IO(err) if err.kind() == io::ErrorKind::Interrupted => {
            PromptError::Cancelled
        }
        other => PromptError::Io(other.to_string()),
    }
}
