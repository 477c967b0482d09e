//! Workspace implementations - local disk and SSH hosts

pub mod local;
pub mod ssh;

use std::path::{Path, PathBuf};

use crate::domain::ports::workspace::{Workspace, WorkspaceProvider, WsResult};
use crate::domain::run::OutputTarget;

pub use local::LocalWorkspace;
pub use ssh::SshWorkspace;

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

/// Opens local or SSH workspaces depending on the run's output target
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardWorkspaces;

impl WorkspaceProvider for StandardWorkspaces {
    fn open(&self, target: &OutputTarget) -> WsResult<Box<dyn Workspace>> {
        match target {
            OutputTarget::Local { path } => Ok(Box::new(LocalWorkspace::open(path)?)),
            OutputTarget::Remote { host, path } => {
                Ok(Box::new(SshWorkspace::open(host, path)?))
            }
        }
    }
}
