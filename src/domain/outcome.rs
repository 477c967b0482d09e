//! Per-run and per-batch deployment results

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::ports::engine::ExecutionError;

/// Why a single run failed
#[derive(Debug, Error)]
pub enum RunError {
    /// Output directory pre-exists under the abort policy
    #[error("output directory already exists: {}", path.display())]
    OutputConflict { path: PathBuf },

    /// The execution engine reported failure
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    Failed,
    /// Never attempted because an earlier run aborted the batch
    Skipped,
}

/// Result of one attempted (or skipped) run; never mutated after creation
#[derive(Debug)]
pub struct RunOutcome {
    pub id: u32,
    pub name: String,
    pub status: RunStatus,
    pub error: Option<RunError>,
    /// Wall-clock time spent on the run; absent for skipped runs
    pub duration: Option<Duration>,
}

impl RunOutcome {
    pub fn succeeded(id: u32, name: &str, duration: Duration) -> Self {
        Self {
            id,
            name: name.to_string(),
            status: RunStatus::Succeeded,
            error: None,
            duration: Some(duration),
        }
    }

    pub fn failed(id: u32, name: &str, error: RunError, duration: Duration) -> Self {
        Self {
            id,
            name: name.to_string(),
            status: RunStatus::Failed,
            error: Some(error),
            duration: Some(duration),
        }
    }

    pub fn skipped(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            status: RunStatus::Skipped,
            error: None,
            duration: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchStatus {
    #[default]
    Completed,
    /// A run failed and the continue-on-failure policy was off
    Aborted,
}

/// Aggregated result of one deployment, one outcome per filtered run
#[derive(Debug, Default)]
pub struct BatchResult {
    pub outcomes: Vec<RunOutcome>,
    pub status: BatchStatus,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: RunOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcome(&self, id: u32) -> Option<&RunOutcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }

    pub fn succeeded(&self) -> usize {
        self.count(RunStatus::Succeeded)
    }

    pub fn failed(&self) -> usize {
        self.count(RunStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(RunStatus::Skipped)
    }

    /// Completed with every attempted run succeeding
    pub fn is_success(&self) -> bool {
        self.status == BatchStatus::Completed && self.failed() == 0
    }

    fn count(&self, status: RunStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}
