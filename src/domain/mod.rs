//! Domain layer - entities, value types, and ports

pub mod conflict;
pub mod outcome;
pub mod ports;
pub mod run;
pub mod selection;

pub use conflict::{ConflictDecision, ConflictPolicy};
pub use outcome::{BatchResult, BatchStatus, RunError, RunOutcome, RunStatus};
pub use run::{Environment, OutputTarget, RemoteHost, RunBatch, RunSpec};
pub use selection::{Selection, SelectionError};
