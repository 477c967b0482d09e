//! Shell execution engine
//!
//! Stages rendered inputs into a run's output directory and runs its command
//! lines through the workspace, streaming command output as deploy events.
//! The same engine serves local and SSH workspaces; `qsub` runs stage an
//! additional `run.qsub` and submit it as their single command.

pub mod inputs;
pub mod qsub;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::ports::engine::{ExecutionEngine, ExecutionError};
use crate::domain::ports::events::{DeployEvent, DeployEventSink};
use crate::domain::ports::workspace::Workspace;
use crate::domain::run::{Environment, RunSpec};

use inputs::Renderer;

/// Submission command for `qsub` runs
const QSUB_SUBMIT: &str = "qsub run.qsub";

pub struct ShellEngine {
    /// Root for resolving relative input paths
    base_path: PathBuf,
    renderer: Renderer,
    sink: Arc<dyn DeployEventSink>,
}

impl ShellEngine {
    pub fn new(base_path: impl Into<PathBuf>, sink: Arc<dyn DeployEventSink>) -> Self {
        Self {
            base_path: base_path.into(),
            renderer: Renderer::new(),
            sink,
        }
    }

    fn run_command(
        &self,
        run: &RunSpec,
        workspace: &dyn Workspace,
        outdir: &Path,
        command: String,
    ) -> Result<(), ExecutionError> {
        self.sink.on_event(DeployEvent::CommandStarted {
            id: run.id,
            command: command.clone(),
        });

        let output = workspace.exec(&command, outdir)?;
        for line in output.stdout.lines().chain(output.stderr.lines()) {
            self.sink.on_event(DeployEvent::CommandOutput {
                id: run.id,
                line: line.to_string(),
            });
        }

        if !output.success() {
            return Err(ExecutionError::CommandFailed {
                command,
                status: output.status_label(),
            });
        }
        Ok(())
    }

    fn cleanup(
        &self,
        run: &RunSpec,
        workspace: &dyn Workspace,
        outdir: &Path,
    ) -> Result<(), ExecutionError> {
        for pattern in &run.cleanup.remove {
            let scoped = format!("{}/{}", outdir.display(), pattern);
            for path in workspace.glob(&scoped)? {
                if workspace.is_dir(&path) {
                    workspace.remove_dir_all(&path)?;
                } else {
                    workspace.remove_file(&path)?;
                }
            }
        }

        for (old, new) in &run.cleanup.aliases {
            let scoped = format!("{}/*{}", outdir.display(), old);
            for path in workspace.glob(&scoped)? {
                let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                    continue;
                };
                let Some(stem) = name.strip_suffix(old.as_str()) else {
                    continue;
                };
                workspace.rename(&path, &path.with_file_name(format!("{}{}", stem, new)))?;
            }
        }
        Ok(())
    }
}

impl ExecutionEngine for ShellEngine {
    fn stage(
        &self,
        run: &RunSpec,
        workspace: &dyn Workspace,
        outdir: &Path,
    ) -> Result<(), ExecutionError> {
        let rendered = self.renderer.gather(&self.base_path, run)?;

        workspace.create_dir_all(outdir)?;
        for (name, content) in rendered.files.iter().chain(rendered.scripts.iter()) {
            workspace.write(&outdir.join(name), content)?;
        }

        if run.environment == Environment::Qsub {
            // Config validation guarantees the section for qsub runs.
            let Some(qsub) = run.qsub.as_ref() else {
                return Ok(());
            };
            let before = self
                .renderer
                .render_commands(&qsub.before_run, &rendered.variables)?;
            let commands = self.renderer.render_commands(&qsub.run, &rendered.variables)?;
            let after = self
                .renderer
                .render_commands(&qsub.after_run, &rendered.variables)?;

            let workdir = workspace.absolute(outdir)?;
            let script = qsub::render(
                run,
                qsub,
                &workdir,
                &rendered.staged_names(),
                &before,
                &commands,
                &after,
            );
            workspace.write(&outdir.join("run.qsub"), &script)?;
        }

        Ok(())
    }

    fn execute(
        &self,
        run: &RunSpec,
        workspace: &dyn Workspace,
        outdir: &Path,
    ) -> Result<(), ExecutionError> {
        let commands = match run.environment {
            Environment::Local => {
                let variables = self.renderer.variables(run);
                self.renderer.render_commands(&run.local.run, &variables)?
            }
            Environment::Qsub => vec![QSUB_SUBMIT.to_string()],
        };

        for command in commands {
            self.run_command(run, workspace, outdir, command)?;
        }

        self.cleanup(run, workspace, outdir)
    }
}
