//! Output-directory conflict policy
//!
//! Decides, once per run and immediately before dispatch, what to do when the
//! run's output directory already exists.

/// How to handle a pre-existing output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Fail the run if the directory exists
    #[default]
    Abort,
    /// Clear the directory's contents before the run starts
    Remove,
    /// Keep the directory as is; existing files may be overwritten
    Use,
}

/// Per-run decision computed from (policy, existence)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    /// Clear the existing directory, then proceed
    ProceedClean,
    /// Proceed without touching whatever is there
    ProceedAsIs,
    /// Do not deploy this run
    Abort,
}

impl ConflictPolicy {
    /// The check-then-act decision for one run
    pub fn decide(&self, location_exists: bool) -> ConflictDecision {
        match (self, location_exists) {
            (ConflictPolicy::Abort, true) => ConflictDecision::Abort,
            (ConflictPolicy::Remove, true) => ConflictDecision::ProceedClean,
            _ => ConflictDecision::ProceedAsIs,
        }
    }

    /// Confirmation prompt for policies that can destroy existing outputs
    pub fn confirmation_prompt(&self) -> Option<&'static str> {
        match self {
            ConflictPolicy::Abort => None,
            ConflictPolicy::Remove => {
                Some("Are you sure you wish to remove existing outputs?")
            }
            ConflictPolicy::Use => {
                Some("Are you sure you wish to overwrite existing outputs?")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_policy_aborts_only_when_location_exists() {
        assert_eq!(
            ConflictPolicy::Abort.decide(true),
            ConflictDecision::Abort
        );
        assert_eq!(
            ConflictPolicy::Abort.decide(false),
            ConflictDecision::ProceedAsIs
        );
    }

    #[test]
    fn remove_policy_clears_only_when_location_exists() {
        assert_eq!(
            ConflictPolicy::Remove.decide(true),
            ConflictDecision::ProceedClean
        );
        assert_eq!(
            ConflictPolicy::Remove.decide(false),
            ConflictDecision::ProceedAsIs
        );
    }

    #[test]
    fn use_policy_never_aborts_or_clears() {
        assert_eq!(
            ConflictPolicy::Use.decide(true),
            ConflictDecision::ProceedAsIs
        );
        assert_eq!(
            ConflictPolicy::Use.decide(false),
            ConflictDecision::ProceedAsIs
        );
    }

    #[test]
    fn only_destructive_policies_prompt() {
        assert!(ConflictPolicy::Abort.confirmation_prompt().is_none());
        assert!(ConflictPolicy::Remove.confirmation_prompt().is_some());
        assert!(ConflictPolicy::Use.confirmation_prompt().is_some());
    }
}
