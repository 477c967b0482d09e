//! Configuration document loading
//!
//! A deployment is described by one YAML document: an optional `defaults`
//! mapping and a non-empty `runs` sequence. Defaults are merged recursively
//! under each run (the run's own keys win) before the run is deserialized and
//! validated. All validation happens here, before any run is attempted.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml_ng::Value;
use thiserror::Error;

use crate::domain::run::{Environment, RunBatch, RunSpec};

/// Configuration document failure; surfaced before deployment starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("unknown key '{key}' in {}", path.display())]
    UnknownKey { path: PathBuf, key: String },

    #[error("{run}: unknown key '{key}'")]
    UnknownRunKey { run: String, key: String },

    #[error("{run}: {message}")]
    RunSchema { run: String, message: String },

    #[error("no runs defined in {}", path.display())]
    NoRuns { path: PathBuf },

    #[error("run id {id} is declared more than once")]
    DuplicateRunId { id: u32 },

    #[error("run {id}: name must not be empty")]
    EmptyName { id: u32 },

    #[error("run {id}: environment is 'qsub' but no qsub section is defined")]
    MissingQsub { id: u32 },

    #[error("run {id}: walltime '{walltime}' is not in H:MM:SS format")]
    InvalidWalltime { id: u32, walltime: String },
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    defaults: Value,
    #[serde(default)]
    runs: Vec<Value>,
}

/// Load and validate a configuration file into a batch
pub fn load(path: &Path) -> Result<RunBatch, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}

/// Parse and validate configuration text; `origin` is used in messages only
pub fn parse(text: &str, origin: &Path) -> Result<RunBatch, ConfigError> {
    let mut unknown = Vec::new();
    let document: Document = serde_ignored::deserialize(
        serde_yaml_ng::Deserializer::from_str(text),
        |path| unknown.push(path.to_string()),
    )
    .map_err(|source| ConfigError::Yaml {
        path: origin.to_path_buf(),
        source,
    })?;
    if let Some(key) = unknown.into_iter().next() {
        return Err(ConfigError::UnknownKey {
            path: origin.to_path_buf(),
            key,
        });
    }

    if document.runs.is_empty() {
        return Err(ConfigError::NoRuns {
            path: origin.to_path_buf(),
        });
    }

    let mut specs = Vec::with_capacity(document.runs.len());
    for (index, raw) in document.runs.into_iter().enumerate() {
        let merged = merge_defaults(raw, &document.defaults);
        let label = run_label(&merged, index);

        let mut unknown = Vec::new();
        let spec: RunSpec =
            serde_ignored::deserialize(merged, |path| unknown.push(path.to_string()))
                .map_err(|e| ConfigError::RunSchema {
                    run: label.clone(),
                    message: e.to_string(),
                })?;
        if let Some(key) = unknown.into_iter().next() {
            return Err(ConfigError::UnknownRunKey { run: label, key });
        }
        specs.push(spec);
    }

    validate(&mut specs)?;
    Ok(RunBatch::new(specs))
}

/// Merge the defaults mapping under a run mapping; the run's own keys win,
/// nested mappings merge recursively
fn merge_defaults(run: Value, defaults: &Value) -> Value {
    match (run, defaults) {
        (Value::Mapping(mut run_map), Value::Mapping(default_map)) => {
            for (key, default_value) in default_map {
                match run_map.get_mut(key) {
                    Some(existing) => {
                        if existing.is_mapping() && default_value.is_mapping() {
                            let merged = merge_defaults(existing.clone(), default_value);
                            *existing = merged;
                        }
                    }
                    None => {
                        run_map.insert(key.clone(), default_value.clone());
                    }
                }
            }
            Value::Mapping(run_map)
        }
        (run, _) => run,
    }
}

fn run_label(value: &Value, index: usize) -> String {
    match value.get("id").and_then(Value::as_u64) {
        Some(id) => format!("run {}", id),
        None => format!("runs[{}]", index),
    }
}

fn validate(specs: &mut [RunSpec]) -> Result<(), ConfigError> {
    let mut seen = std::collections::BTreeSet::new();
    for spec in specs.iter_mut() {
        if !seen.insert(spec.id) {
            return Err(ConfigError::DuplicateRunId { id: spec.id });
        }
        if spec.name.trim().is_empty() {
            return Err(ConfigError::EmptyName { id: spec.id });
        }
        if spec.environment == Environment::Qsub {
            let Some(qsub) = spec.qsub.as_mut() else {
                return Err(ConfigError::MissingQsub { id: spec.id });
            };
            qsub.walltime = normalize_walltime(&qsub.walltime).ok_or_else(|| {
                ConfigError::InvalidWalltime {
                    id: spec.id,
                    walltime: qsub.walltime.clone(),
                }
            })?;
        }
    }
    Ok(())
}

/// Normalize a walltime to `H:MM:SS`; accepts `H`, `H:MM` and `H:MM:SS`
fn normalize_walltime(raw: &str) -> Option<String> {
    let parts: Vec<u32> = raw
        .split(':')
        .map(|part| part.trim().parse().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [h] => Some(format!("{}:00:00", h)),
        [h, m] => Some(format!("{}:{:02}:00", h, m)),
        [h, m, s] => Some(format!("{}:{:02}:{:02}", h, m, s)),
        _ => None,
    }
}
