//! Deploy event port
//!
//! Observable lifecycle of a deployment. Enables leveled console reporting
//! and NDJSON event streams without coupling the orchestrator to either.

use std::path::PathBuf;

/// Event emitted while deploying a batch
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// Deployment started for the filtered batch
    BatchStarted { total: usize, dry_run: bool },

    /// A run is about to be deployed
    RunStarted {
        id: u32,
        name: String,
        index: usize,
        total: usize,
    },

    /// The run's output root has been resolved
    RunLocation { id: u32, location: String },

    /// A pre-existing output directory was cleared under the remove policy
    OutputCleared { id: u32, path: PathBuf },

    /// A command line is about to run
    CommandStarted { id: u32, command: String },

    /// One line of command stdout/stderr
    CommandOutput { id: u32, line: String },

    RunSucceeded { id: u32, name: String },

    RunFailed { id: u32, name: String, error: String },

    /// Run never attempted because an earlier failure aborted the batch
    RunSkipped { id: u32, name: String },

    BatchCompleted {
        succeeded: usize,
        failed: usize,
        skipped: usize,
        aborted: bool,
    },
}

/// Receives deploy events.
///
/// Implementations:
/// - `HumanSink`: leveled console output
/// - `JsonSink`: NDJSON event stream
/// - `NoopEventSink`: silent operation
pub trait DeployEventSink: Send + Sync {
    fn on_event(&self, event: DeployEvent);
}

/// Sink that drops every event
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}
}
