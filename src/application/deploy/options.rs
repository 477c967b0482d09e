//! Deploy options

use std::path::PathBuf;

use crate::domain::conflict::ConflictPolicy;

/// Options for one `deploy` invocation
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Root for resolving relative input and output paths
    pub base_path: PathBuf,
    /// What to do when a run's output directory already exists
    pub policy: ConflictPolicy,
    /// Record a failed run and keep going instead of aborting the batch
    pub continue_on_failure: bool,
    /// Stage directories and inputs only; never run commands
    pub dry_run: bool,
}

impl DeployOptions {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            policy: ConflictPolicy::default(),
            continue_on_failure: false,
            dry_run: false,
        }
    }

    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_continue_on_failure(mut self, continue_on_failure: bool) -> Self {
        self.continue_on_failure = continue_on_failure;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
