//! Deploy command handler
//!
//! Wires the CLI surface to the deploy use case: selection parsing, config
//! loading and validation, the destructive-policy confirmation gate, and the
//! exit status. Errors raised before deployment starts are terminal for the
//! whole invocation; nothing is deployed after them.

use std::env;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::Result;

use runbatch::application::deploy::{DeployOptions, DeployUseCase};
use runbatch::config;
use runbatch::domain::conflict::ConflictPolicy;
use runbatch::domain::outcome::BatchStatus;
use runbatch::domain::ports::{AssumeYes, Confirmation, DeployEventSink};
use runbatch::domain::selection::Selection;
use runbatch::infrastructure::{ShellEngine, StandardWorkspaces, TerminalConfirmation};
use runbatch::ui::events::{HumanSink, JsonSink};
use runbatch::ui::{LogLevel, Reporter};

/// Execute the deploy command
#[allow(clippy::too_many_arguments)]
pub fn cmd_deploy(
    config_path: &Path,
    basepath: &Path,
    runs: Option<&str>,
    if_exists: &str,
    ignore_fail: bool,
    dry_run: bool,
    yes: bool,
    log_level: &str,
    json: bool,
) -> Result<()> {
    let reporter = Reporter::new(LogLevel::from_flag(log_level), json);

    let selection = match Selection::parse(runs.unwrap_or_default()) {
        Ok(selection) => selection,
        Err(err) => {
            reporter.critical(&err.to_string());
            process::exit(1);
        }
    };

    let batch = match config::load(config_path) {
        Ok(batch) => batch,
        Err(err) => {
            reporter.critical(&err.to_string());
            process::exit(1);
        }
    };

    let filtered = batch.filter(&selection);
    if filtered.is_empty() {
        reporter.warn("selection matched no runs; nothing to deploy");
        return Ok(());
    }

    let policy = match if_exists {
        "remove" => ConflictPolicy::Remove,
        "use" => ConflictPolicy::Use,
        _ => ConflictPolicy::Abort,
    };

    let confirmer: Box<dyn Confirmation> = if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalConfirmation)
    };
    if let Some(prompt) = policy.confirmation_prompt() {
        if !confirmer.confirm(prompt) {
            reporter.info("aborted; nothing was deployed");
            return Ok(());
        }
    }

    let base_path = absolutize(basepath)?;

    let sink: Arc<dyn DeployEventSink> = if json {
        Arc::new(JsonSink::new())
    } else {
        Arc::new(HumanSink::new(reporter))
    };

    let engine = ShellEngine::new(&base_path, Arc::clone(&sink));
    let use_case = DeployUseCase::new(StandardWorkspaces, engine);
    let options = DeployOptions::new(base_path)
        .with_policy(policy)
        .with_continue_on_failure(ignore_fail)
        .with_dry_run(dry_run);

    let result = use_case.deploy_with_events(&filtered, &options, sink.as_ref());

    if result.status == BatchStatus::Aborted || result.failed() > 0 {
        process::exit(1);
    }
    Ok(())
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}
