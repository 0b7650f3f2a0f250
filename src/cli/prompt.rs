//! Interactive prompts behind a trait so command flows can be driven in tests.

use crate::error::WikiError;
use dialoguer::{Confirm, Input};

pub trait Prompter {
    fn confirm(&self, question: &str) -> Result<bool, WikiError>;

    /// Free-text answer; an empty answer yields `default`.
    fn input(&self, question: &str, default: &str) -> Result<String, WikiError>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str) -> Result<bool, WikiError> {
        Ok(Confirm::new()
            .with_prompt(question)
            .default(true)
            .interact()?)
    }

    fn input(&self, question: &str, default: &str) -> Result<String, WikiError> {
        let answer: String = Input::new()
            .with_prompt(question)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()?;
        let answer = answer.trim().to_lowercase();
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }
}
