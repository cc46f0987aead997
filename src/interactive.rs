//! Interactive prompts.
//!
//! Commands ask questions through [`Prompter`] so tests can script the answers.

use crate::error::BootstrapError;
use std::io::IsTerminal;
use std::sync::Arc;

pub trait Prompter: Send + Sync {
    /// Yes/no question with a default answer.
    fn confirm(&self, question: &str, default: bool) -> Result<bool, BootstrapError>;

    /// Free-text question; `default` is used when the answer is empty.
    fn input(&self, question: &str, default: Option<&str>) -> Result<String, BootstrapError>;
}

/// Terminal prompter backed by `dialoguer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerPrompter;

fn input_error(e: dialoguer::Error) -> BootstrapError {
    BootstrapError::ConfigError(format!("Failed to get user input: {}", e))
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, question: &str, default: bool) -> Result<bool, BootstrapError> {
        dialoguer::Confirm::new()
            .with_prompt(question)
            .default(default)
            .interact()
            .map_err(input_error)
    }

    fn input(&self, question: &str, default: Option<&str>) -> Result<String, BootstrapError> {
        let mut input = dialoguer::Input::<String>::new().with_prompt(question);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(input_error)
    }
}

/// Prompter for non-interactive runs: every question takes its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn confirm(&self, _question: &str, default: bool) -> Result<bool, BootstrapError> {
        Ok(default)
    }

    fn input(&self, question: &str, default: Option<&str>) -> Result<String, BootstrapError> {
        default.map(str::to_string).ok_or_else(|| {
            BootstrapError::ConfigError(format!("No answer available for '{}'", question))
        })
    }
}

/// Dialoguer when a person can answer, defaults otherwise.
pub fn prompter_for(interactive: bool) -> Arc<dyn Prompter> {
    if interactive {
        Arc::new(DialoguerPrompter)
    } else {
        Arc::new(DefaultsPrompter)
    }
}

/// Prompter matching the current stdin (piped or CI runs take defaults).
pub fn stdin_prompter() -> Arc<dyn Prompter> {
    prompter_for(std::io::stdin().is_terminal())
}
