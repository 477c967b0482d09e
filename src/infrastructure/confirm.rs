//! Terminal confirmation prompts

use dialoguer::Confirm;

use crate::domain::ports::confirmation::Confirmation;

/// Asks on the terminal via dialoguer; defaults to "no"
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmation;

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}
