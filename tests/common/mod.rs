//! Common test utilities: an isolated temp environment plus helpers to run
//! the runbatch binary against it.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// Result of running the runbatch CLI
#[derive(Debug)]
pub struct RunResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment rooted in a temp directory
pub struct TestEnv {
    root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Write a file, creating parent directories as needed
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn write_config(&self, yaml: &str) {
        self.write("config.yaml", yaml);
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    /// Run the runbatch binary from the environment root
    pub fn run(&self, args: &[&str]) -> RunResult {
        let output = Command::new(env!("CARGO_BIN_EXE_runbatch"))
            .current_dir(self.root.path())
            .args(args)
            .output()
            .unwrap();

        RunResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Run `runbatch config.yaml` with extra arguments
    pub fn deploy(&self, extra: &[&str]) -> RunResult {
        let mut args = vec!["config.yaml"];
        args.extend_from_slice(extra);
        self.run(&args)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
