//! Deploy use case
//!
//! Sequences a filtered batch through conflict resolution and the execution
//! engine, one run at a time, in batch order. Each run produces an explicit
//! `RunOutcome`; the loop decides continue-vs-halt from the failure policy
//! rather than unwinding. Earlier runs are never rolled back.

use std::path::PathBuf;
use std::time::Instant;

use crate::domain::conflict::ConflictDecision;
use crate::domain::outcome::{BatchResult, BatchStatus, RunError, RunOutcome};
use crate::domain::ports::{
    DeployEvent, DeployEventSink, ExecutionEngine, ExecutionError, NoopEventSink,
    WorkspaceProvider,
};
use crate::domain::run::{RunBatch, RunSpec};

use super::options::DeployOptions;

/// Deploy use case, parameterized by its ports
pub struct DeployUseCase<P, E>
where
    P: WorkspaceProvider,
    E: ExecutionEngine,
{
    workspaces: P,
    engine: E,
}

impl<P, E> DeployUseCase<P, E>
where
    P: WorkspaceProvider,
    E: ExecutionEngine,
{
    pub fn new(workspaces: P, engine: E) -> Self {
        Self { workspaces, engine }
    }

    /// Deploy the batch without event reporting
    pub fn deploy(&self, batch: &RunBatch, options: &DeployOptions) -> BatchResult {
        self.deploy_with_events(batch, options, &NoopEventSink)
    }

    /// Deploy the batch, emitting lifecycle events as it goes.
    ///
    /// Runs are attempted strictly one at a time; run `k + 1` does not start
    /// until run `k`'s outcome is recorded. Outcomes appear in batch order,
    /// one per run. When a run fails and `continue_on_failure` is off, the
    /// remaining runs are recorded as skipped and the batch is aborted.
    pub fn deploy_with_events(
        &self,
        batch: &RunBatch,
        options: &DeployOptions,
        sink: &dyn DeployEventSink,
    ) -> BatchResult {
        let mut result = BatchResult::new();
        let total = batch.len();

        sink.on_event(DeployEvent::BatchStarted {
            total,
            dry_run: options.dry_run,
        });

        let mut runs = batch.iter().enumerate();
        for (index, run) in &mut runs {
            sink.on_event(DeployEvent::RunStarted {
                id: run.id,
                name: run.name.clone(),
                index,
                total,
            });

            let started = Instant::now();
            match self.deploy_one(run, options, sink) {
                Ok(()) => {
                    sink.on_event(DeployEvent::RunSucceeded {
                        id: run.id,
                        name: run.name.clone(),
                    });
                    result.push(RunOutcome::succeeded(run.id, &run.name, started.elapsed()));
                }
                Err(error) => {
                    sink.on_event(DeployEvent::RunFailed {
                        id: run.id,
                        name: run.name.clone(),
                        error: error.to_string(),
                    });
                    result.push(RunOutcome::failed(run.id, &run.name, error, started.elapsed()));

                    if !options.continue_on_failure {
                        result.status = BatchStatus::Aborted;
                        break;
                    }
                }
            }
        }

        // Anything left in the iterator was never attempted.
        for (_, run) in runs {
            sink.on_event(DeployEvent::RunSkipped {
                id: run.id,
                name: run.name.clone(),
            });
            result.push(RunOutcome::skipped(run.id, &run.name));
        }

        sink.on_event(DeployEvent::BatchCompleted {
            succeeded: result.succeeded(),
            failed: result.failed(),
            skipped: result.skipped(),
            aborted: result.status == BatchStatus::Aborted,
        });

        result
    }

    fn deploy_one(
        &self,
        run: &RunSpec,
        options: &DeployOptions,
        sink: &dyn DeployEventSink,
    ) -> Result<(), RunError> {
        let target = run.output_target(&options.base_path);
        sink.on_event(DeployEvent::RunLocation {
            id: run.id,
            location: target.to_string(),
        });

        let workspace = self
            .workspaces
            .open(&target)
            .map_err(|e| RunError::Execution(ExecutionError::Workspace(e)))?;

        let outdir = PathBuf::from(run.directory_name());

        // Check-then-act, once per run, immediately before dispatch. Clearing
        // must happen before the engine is invoked, never after.
        match options.policy.decide(workspace.exists(&outdir)) {
            ConflictDecision::Abort => {
                return Err(RunError::OutputConflict {
                    path: workspace.root().join(&outdir),
                });
            }
            ConflictDecision::ProceedClean => {
                workspace
                    .remove_dir_all(&outdir)
                    .map_err(|e| RunError::Execution(ExecutionError::Workspace(e)))?;
                sink.on_event(DeployEvent::OutputCleared {
                    id: run.id,
                    path: workspace.root().join(&outdir),
                });
            }
            ConflictDecision::ProceedAsIs => {}
        }

        self.engine.stage(run, workspace.as_ref(), &outdir)?;

        if options.dry_run {
            return Ok(());
        }

        self.engine.execute(run, workspace.as_ref(), &outdir)?;
        Ok(())
    }
}
