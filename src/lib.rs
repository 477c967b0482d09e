//! runbatch - batch run deployment
//!
//! Deploys a batch of independently configured computational runs, described
//! in one YAML document, to local or remote execution environments. The
//! deploy use case decides which runs to attempt, in what order, how to
//! resolve output-directory conflicts, and what a failed run means for the
//! rest of the batch.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;

// Re-exports for convenience
pub use application::deploy::{DeployOptions, DeployUseCase};
pub use config::ConfigError;
pub use domain::{
    BatchResult, BatchStatus, ConflictPolicy, RunBatch, RunSpec, RunStatus, Selection,
    SelectionError,
};
