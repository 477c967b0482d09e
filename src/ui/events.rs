//! Deploy event sinks
//!
//! `HumanSink` renders lifecycle events through the leveled reporter;
//! `JsonSink` emits one JSON object per event for machine consumption.

use chrono::Utc;
use serde_json::json;

use crate::domain::ports::events::{DeployEvent, DeployEventSink};

use super::Reporter;

/// Human-readable event rendering at the reporter's levels
pub struct HumanSink {
    reporter: Reporter,
}

impl HumanSink {
    pub fn new(reporter: Reporter) -> Self {
        Self { reporter }
    }
}

impl DeployEventSink for HumanSink {
    fn on_event(&self, event: DeployEvent) {
        let r = &self.reporter;
        match event {
            DeployEvent::BatchStarted { total, dry_run } => {
                let suffix = if dry_run { " (dry run)" } else { "" };
                r.info(&format!("deploying {} run(s){}", total, suffix));
            }
            DeployEvent::RunStarted {
                id,
                name,
                index,
                total,
            } => {
                r.info(&format!(
                    "deploying run {}: {} ({} of {})",
                    id,
                    name,
                    index + 1,
                    total
                ));
            }
            DeployEvent::RunLocation { id, location } => {
                r.debug(&format!("run {}: output root: {}", id, location));
            }
            DeployEvent::OutputCleared { id, path } => {
                r.info(&format!(
                    "run {}: removed existing output dir: {}",
                    id,
                    path.display()
                ));
            }
            DeployEvent::CommandStarted { id, command } => {
                r.exec(&format!("run {}: executing: {}", id, command));
            }
            DeployEvent::CommandOutput { id, line } => {
                r.exec(&format!("run {}: {}", id, line));
            }
            DeployEvent::RunSucceeded { id, name } => {
                r.info(&format!("finished run {}: {}", id, name));
            }
            DeployEvent::RunFailed { id, name, error } => {
                r.error(&format!("run {} ({}) failed: {}", id, name, error));
            }
            DeployEvent::RunSkipped { id, name } => {
                r.warn(&format!("run {} ({}) was never attempted", id, name));
            }
            DeployEvent::BatchCompleted {
                succeeded,
                failed,
                skipped,
                aborted,
            } => {
                let summary = format!(
                    "{} succeeded, {} failed, {} skipped",
                    succeeded, failed, skipped
                );
                if aborted {
                    r.critical(&format!("batch aborted: {}", summary));
                } else {
                    r.info(&format!("batch complete: {}", summary));
                }
            }
        }
    }
}

/// NDJSON event stream: one timestamped object per line on stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSink;

impl JsonSink {
    pub fn new() -> Self {
        Self
    }

    fn emit(&self, value: serde_json::Value) {
        println!("{}", value);
    }

    fn stamp(&self) -> String {
        Utc::now().to_rfc3339()
    }
}

impl DeployEventSink for JsonSink {
    fn on_event(&self, event: DeployEvent) {
        let value = match event {
            DeployEvent::BatchStarted { total, dry_run } => json!({
                "event": "batch_started",
                "ts": self.stamp(),
                "total": total,
                "dry_run": dry_run,
            }),
            DeployEvent::RunStarted { id, name, index, total } => json!({
                "event": "run_started",
                "ts": self.stamp(),
                "id": id,
                "name": name,
                "index": index,
                "total": total,
            }),
            DeployEvent::RunLocation { id, location } => json!({
                "event": "run_location",
                "ts": self.stamp(),
                "id": id,
                "location": location,
            }),
            DeployEvent::OutputCleared { id, path } => json!({
                "event": "output_cleared",
                "ts": self.stamp(),
                "id": id,
                "path": path.display().to_string(),
            }),
            DeployEvent::CommandStarted { id, command } => json!({
                "event": "command_started",
                "ts": self.stamp(),
                "id": id,
                "command": command,
            }),
            DeployEvent::CommandOutput { id, line } => json!({
                "event": "command_output",
                "ts": self.stamp(),
                "id": id,
                "line": line,
            }),
            DeployEvent::RunSucceeded { id, name } => json!({
                "event": "run_succeeded",
                "ts": self.stamp(),
                "id": id,
                "name": name,
            }),
            DeployEvent::RunFailed { id, name, error } => json!({
                "event": "run_failed",
                "ts": self.stamp(),
                "id": id,
                "name": name,
                "error": error,
            }),
            DeployEvent::RunSkipped { id, name } => json!({
                "event": "run_skipped",
                "ts": self.stamp(),
                "id": id,
                "name": name,
            }),
            DeployEvent::BatchCompleted {
                succeeded,
                failed,
                skipped,
                aborted,
            } => json!({
                "event": "batch_completed",
                "ts": self.stamp(),
                "succeeded": succeeded,
                "failed": failed,
                "skipped": skipped,
                "aborted": aborted,
            }),
        };
        self.emit(value);
    }
}
