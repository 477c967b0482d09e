//! Ports - interfaces the orchestrator depends on

pub mod confirmation;
pub mod engine;
pub mod events;
pub mod workspace;

pub use confirmation::{AssumeYes, Confirmation};
pub use engine::{ExecutionEngine, ExecutionError};
pub use events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use workspace::{CommandOutput, Workspace, WorkspaceProvider, WsError, WsResult};
