//! Execution engine port
//!
//! Staging and command execution are separate entry points so a dry run can
//! set up output directories and inputs without ever reaching the
//! command-running side.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::workspace::{Workspace, WsError};
use crate::domain::run::RunSpec;

/// Failure reported by the execution engine for a single run
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("input path does not exist: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("input path is not a file: {}", path.display())]
    NotAFile { path: PathBuf },

    #[error("two scripts share the name '{name}'")]
    DuplicateScript { name: String },

    #[error("variable '{name}' is not defined (referenced from {context})")]
    UnknownVariable { name: String, context: String },

    #[error("file id '{name}' is not defined (referenced from {context})")]
    UnknownFileRef { name: String, context: String },

    #[error("command failed with {status}: {command}")]
    CommandFailed { command: String, status: String },

    #[error(transparent)]
    Workspace(#[from] WsError),
}

/// Stages inputs and runs a single run's commands.
///
/// `stage` must be idempotent with respect to directory creation. `execute`
/// is never called for a dry run.
pub trait ExecutionEngine {
    /// Create the output directory and write rendered inputs into it
    fn stage(
        &self,
        run: &RunSpec,
        workspace: &dyn Workspace,
        outdir: &Path,
    ) -> Result<(), ExecutionError>;

    /// Run the configured commands in the output directory
    fn execute(
        &self,
        run: &RunSpec,
        workspace: &dyn Workspace,
        outdir: &Path,
    ) -> Result<(), ExecutionError>;
}
