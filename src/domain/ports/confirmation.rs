//! Confirmation port
//!
//! Destructive conflict policies ask for a yes/no answer before any run is
//! deployed. The capability is injected so policy logic stays testable
//! without a terminal.

/// Asks the user a yes/no question
pub trait Confirmation {
    /// `true` means proceed; anything else declines
    fn confirm(&self, prompt: &str) -> bool;
}

/// Answers yes without asking; used for `--yes`
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
