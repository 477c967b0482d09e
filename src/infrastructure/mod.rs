//! Infrastructure layer - concrete implementations of the domain ports

pub mod confirm;
pub mod engine;
pub mod workspace;

pub use confirm::TerminalConfirmation;
pub use engine::ShellEngine;
pub use workspace::{LocalWorkspace, SshWorkspace, StandardWorkspaces};
