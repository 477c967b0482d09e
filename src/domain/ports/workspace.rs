//! Workspace port - rooted file and command operations
//!
//! A workspace is anchored at a run's output root; every path handed to it is
//! relative to that root. Implementations cover the local filesystem and SSH
//! hosts, plus in-memory doubles for testing.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::run::OutputTarget;

pub type WsResult<T> = Result<T, WsError>;

/// Workspace operation errors
#[derive(Debug, Error)]
pub enum WsError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A remote (ssh) invocation failed before the payload command could run
    #[error("remote operation failed: {0}")]
    Remote(String),

    #[error("invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

/// Captured result of one command line
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Process exit code; `None` when killed by a signal
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }

    /// Human-readable exit status, e.g. `exit code 2`
    pub fn status_label(&self) -> String {
        match self.status_code {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        }
    }
}

/// Rooted file/command operations for one output target.
///
/// Implementations:
/// - `LocalWorkspace` - std::fs against a local directory
/// - `SshWorkspace` - one ssh subprocess per operation
pub trait Workspace {
    /// The root all relative paths resolve against
    fn root(&self) -> &Path;

    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and its parents; succeeds if it already exists
    fn create_dir_all(&self, path: &Path) -> WsResult<()>;

    /// Remove a directory and everything beneath it
    fn remove_dir_all(&self, path: &Path) -> WsResult<()>;

    fn remove_file(&self, path: &Path) -> WsResult<()>;

    fn read_to_string(&self, path: &Path) -> WsResult<String>;

    fn write(&self, path: &Path, content: &str) -> WsResult<()>;

    fn rename(&self, from: &Path, to: &Path) -> WsResult<()>;

    /// Paths matching a glob pattern, relative to the root
    fn glob(&self, pattern: &str) -> WsResult<Vec<PathBuf>>;

    /// Absolute form of a path inside the workspace
    fn absolute(&self, path: &Path) -> WsResult<PathBuf>;

    /// Run a shell command line with `cwd` (relative to the root) as its
    /// working directory, blocking until it finishes
    fn exec(&self, command: &str, cwd: &Path) -> WsResult<CommandOutput>;
}

/// Opens a workspace for a run's output target
pub trait WorkspaceProvider {
    fn open(&self, target: &OutputTarget) -> WsResult<Box<dyn Workspace>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_output_success_requires_zero_exit() {
        let ok = CommandOutput {
            status_code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        };
        let failed = CommandOutput {
            status_code: Some(2),
            stdout: String::new(),
            stderr: String::new(),
        };
        let signalled = CommandOutput {
            status_code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(ok.success());
        assert!(!failed.success());
        assert!(!signalled.success());
    }

    #[test]
    fn status_label_names_the_code() {
        let output = CommandOutput {
            status_code: Some(127),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(output.status_label(), "exit code 127");
    }
}
