//! Run entities
//!
//! A `RunSpec` is one configured execution unit; a `RunBatch` is the ordered
//! collection produced from a configuration document. Both are immutable once
//! validated.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use super::selection::Selection;

/// Where a run's commands are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Commands run directly in the output directory
    #[default]
    Local,
    /// A PBS submission script is generated and handed to `qsub`
    Qsub,
}

/// SSH endpoint for a remote output target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteHost {
    pub hostname: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
}

fn default_ssh_port() -> u16 {
    22
}

impl RemoteHost {
    /// `user@host` destination as understood by ssh
    pub fn destination(&self) -> String {
        match &self.username {
            Some(user) => format!("{}@{}", user, self.hostname),
            None => self.hostname.clone(),
        }
    }
}

/// Commands for a `local` run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalSpec {
    #[serde(default)]
    pub run: Vec<String>,
}

/// PBS scheduler parameters for a `qsub` run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QsubSpec {
    /// PBS job name; defaults to the run's directory name
    #[serde(default)]
    pub jobname: Option<String>,
    #[serde(default = "default_nnodes")]
    pub nnodes: u32,
    #[serde(default = "default_cores_per_node")]
    pub cores_per_node: u32,
    #[serde(default = "default_walltime")]
    pub walltime: String,
    #[serde(default)]
    pub queue: Option<String>,
    /// Mail address for begin/end/abort notifications
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub modules: Vec<String>,
    /// Commands run in the working directory before the main run
    #[serde(default)]
    pub before_run: Vec<String>,
    /// Main commands, run in `$TMPDIR`
    #[serde(default)]
    pub run: Vec<String>,
    /// Commands run in the working directory after the main run
    #[serde(default)]
    pub after_run: Vec<String>,
    /// Glob suffixes copied back from `$TMPDIR` to the working directory
    #[serde(default)]
    pub from_temp: Vec<String>,
}

fn default_nnodes() -> u32 {
    1
}

fn default_cores_per_node() -> u32 {
    16
}

fn default_walltime() -> String {
    "24:00:00".to_string()
}

impl Default for QsubSpec {
    fn default() -> Self {
        Self {
            jobname: None,
            nnodes: default_nnodes(),
            cores_per_node: default_cores_per_node(),
            walltime: default_walltime(),
            queue: None,
            email: None,
            modules: Vec::new(),
            before_run: Vec::new(),
            run: Vec::new(),
            after_run: Vec::new(),
            from_temp: Vec::new(),
        }
    }
}

/// Post-run cleanup of the output directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanupSpec {
    /// Glob patterns removed from the output directory
    #[serde(default)]
    pub remove: Vec<String>,
    /// Filename suffix renames, e.g. `.out -> .stdout`
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// One configured run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    /// Unique within the batch
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Script paths, resolved against the base path
    #[serde(default)]
    pub scripts: Vec<PathBuf>,
    /// File id -> path; contents are injectable into scripts via `@f{id}`
    #[serde(default)]
    pub files: BTreeMap<String, PathBuf>,
    /// Scalars substituted for `@v{name}` tags in scripts and commands
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
    /// Output root, relative to the base path (or to the remote login dir)
    #[serde(default = "default_outpath")]
    pub outpath: PathBuf,
    /// When present, the run's output lives on this host and commands run there
    #[serde(default)]
    pub remote: Option<RemoteHost>,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub local: LocalSpec,
    #[serde(default)]
    pub qsub: Option<QsubSpec>,
    #[serde(default)]
    pub cleanup: CleanupSpec,
}

fn default_outpath() -> PathBuf {
    PathBuf::from("output")
}

impl RunSpec {
    /// Name of the run's directory inside the output root
    pub fn directory_name(&self) -> String {
        format!("{}_{}", self.id, self.name)
    }

    /// Resolve the output root this run deploys into
    pub fn output_target(&self, base_path: &Path) -> OutputTarget {
        match &self.remote {
            Some(host) => OutputTarget::Remote {
                host: host.clone(),
                path: self.outpath.clone(),
            },
            None => OutputTarget::Local {
                path: base_path.join(&self.outpath),
            },
        }
    }
}

/// Output root for one run: a local directory or a directory on an SSH host
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    Local { path: PathBuf },
    Remote { host: RemoteHost, path: PathBuf },
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Local { path } => write!(f, "{}", path.display()),
            OutputTarget::Remote { host, path } => {
                write!(f, "{}:{}", host.destination(), path.display())
            }
        }
    }
}

/// Ordered, validated batch of runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunBatch {
    runs: Vec<RunSpec>,
}

impl RunBatch {
    /// Build a batch from already-validated runs, preserving order
    pub fn new(runs: Vec<RunSpec>) -> Self {
        Self { runs }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RunSpec> {
        self.runs.iter()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The subsequence of runs selected for deployment.
    ///
    /// `Selection::All` returns the batch unchanged. With an id set, runs keep
    /// their original relative order; selected ids with no matching run are
    /// silently ignored, so the result may be empty.
    pub fn filter(&self, selection: &Selection) -> RunBatch {
        match selection {
            Selection::All => self.clone(),
            Selection::Ids(_) => RunBatch {
                runs: self
                    .runs
                    .iter()
                    .filter(|run| selection.contains(run.id))
                    .cloned()
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn run(id: u32, name: &str) -> RunSpec {
        RunSpec {
            id,
            name: name.to_string(),
            description: String::new(),
            scripts: Vec::new(),
            files: BTreeMap::new(),
            variables: BTreeMap::new(),
            outpath: PathBuf::from("output"),
            remote: None,
            environment: Environment::Local,
            local: LocalSpec::default(),
            qsub: None,
            cleanup: CleanupSpec::default(),
        }
    }

    fn batch() -> RunBatch {
        RunBatch::new(vec![run(1, "first"), run(2, "second"), run(3, "third")])
    }

    #[test]
    fn directory_name_joins_id_and_name() {
        assert_eq!(run(7, "opt").directory_name(), "7_opt");
    }

    #[test]
    fn local_target_is_rooted_at_base_path() {
        let target = run(1, "a").output_target(Path::new("/work"));
        assert_eq!(
            target,
            OutputTarget::Local {
                path: PathBuf::from("/work/output")
            }
        );
    }

    #[test]
    fn remote_target_keeps_outpath_relative() {
        let mut spec = run(1, "a");
        spec.remote = Some(RemoteHost {
            hostname: "hpc.example.org".to_string(),
            username: Some("alice".to_string()),
            port: 22,
        });
        let target = spec.output_target(Path::new("/work"));
        assert_eq!(target.to_string(), "alice@hpc.example.org:output");
    }

    #[test]
    fn filter_all_is_identity() {
        let batch = batch();
        let filtered = batch.filter(&Selection::All);
        assert_eq!(filtered, batch);
    }

    #[test]
    fn filter_preserves_batch_order() {
        let filtered = batch().filter(&Selection::parse("3,1").unwrap());
        let ids: Vec<u32> = filtered.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn filter_ignores_unmatched_ids() {
        let filtered = batch().filter(&Selection::parse("2,99").unwrap());
        let ids: Vec<u32> = filtered.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn filter_may_be_empty() {
        assert!(batch().filter(&Selection::parse("42").unwrap()).is_empty());
    }
}
