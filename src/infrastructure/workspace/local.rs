//! Local workspace implementation
//!
//! Implements the workspace port against the local filesystem. Writes are
//! atomic (tempfile + rename) so a crashed deployment never leaves a
//! half-written input behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::domain::ports::workspace::{CommandOutput, Workspace, WsError, WsResult};

use super::expand_home;

/// Workspace rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    root: PathBuf,
}

impl LocalWorkspace {
    /// Open a workspace, creating the root directory if needed
    pub fn open(root: &Path) -> WsResult<Self> {
        let root = expand_home(root);
        fs::create_dir_all(&root)?;
        let root = root.canonicalize()?;
        Ok(Self { root })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Workspace for LocalWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path).is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> WsResult<()> {
        fs::create_dir_all(self.resolve(path))?;
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> WsResult<()> {
        fs::remove_dir_all(self.resolve(path))?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> WsResult<()> {
        fs::remove_file(self.resolve(path))?;
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> WsResult<String> {
        let full = self.resolve(path);
        fs::read_to_string(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => WsError::NotFound(full),
            _ => WsError::Io(e),
        })
    }

    fn write(&self, path: &Path, content: &str) -> WsResult<()> {
        let full = self.resolve(path);
        let parent = full.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&full).map_err(|e| WsError::Io(e.error))?;
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> WsResult<()> {
        fs::rename(self.resolve(from), self.resolve(to))?;
        Ok(())
    }

    fn glob(&self, pattern: &str) -> WsResult<Vec<PathBuf>> {
        let rooted = self.root.join(pattern);
        let rooted = rooted.to_string_lossy();
        let entries = glob::glob(&rooted).map_err(|e| WsError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        let mut matches = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| WsError::Io(e.into_error()))?;
            let relative = path.strip_prefix(&self.root).unwrap_or(&path);
            matches.push(relative.to_path_buf());
        }
        Ok(matches)
    }

    fn absolute(&self, path: &Path) -> WsResult<PathBuf> {
        Ok(self.resolve(path))
    }

    fn exec(&self, command: &str, cwd: &Path) -> WsResult<CommandOutput> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(self.resolve(cwd))
            .output()?;

        Ok(CommandOutput {
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn workspace() -> (tempfile::TempDir, LocalWorkspace) {
        let dir = tempdir().unwrap();
        let ws = LocalWorkspace::open(dir.path()).unwrap();
        (dir, ws)
    }

    #[test]
    fn open_creates_the_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("deep/nested/root");
        let ws = LocalWorkspace::open(&root).unwrap();
        assert!(root.is_dir());
        assert!(ws.root().is_absolute());
    }

    #[test]
    fn write_then_read_round_trips() {
        let (_dir, ws) = workspace();
        ws.write(Path::new("a/b.txt"), "payload").unwrap();
        assert!(ws.is_file(Path::new("a/b.txt")));
        assert_eq!(ws.read_to_string(Path::new("a/b.txt")).unwrap(), "payload");
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let (_dir, ws) = workspace();
        assert!(matches!(
            ws.read_to_string(Path::new("absent.txt")),
            Err(WsError::NotFound(_))
        ));
    }

    #[test]
    fn remove_dir_all_clears_contents() {
        let (_dir, ws) = workspace();
        ws.write(Path::new("1_run/old.out"), "stale").unwrap();
        ws.remove_dir_all(Path::new("1_run")).unwrap();
        assert!(!ws.exists(Path::new("1_run")));
    }

    #[test]
    fn glob_returns_relative_matches() {
        let (_dir, ws) = workspace();
        ws.write(Path::new("1_run/a.out"), "").unwrap();
        ws.write(Path::new("1_run/b.out"), "").unwrap();
        ws.write(Path::new("1_run/keep.in"), "").unwrap();

        let matches = ws.glob("1_run/*.out").unwrap();
        assert_eq!(
            matches,
            vec![PathBuf::from("1_run/a.out"), PathBuf::from("1_run/b.out")]
        );
    }

    #[test]
    fn glob_without_matches_is_empty() {
        let (_dir, ws) = workspace();
        assert!(ws.glob("nothing/*.out").unwrap().is_empty());
    }

    #[test]
    fn exec_runs_in_the_given_directory() {
        let (_dir, ws) = workspace();
        ws.create_dir_all(Path::new("1_run")).unwrap();

        let output = ws.exec("echo hello > out.txt", Path::new("1_run")).unwrap();
        assert!(output.success());
        assert_eq!(
            ws.read_to_string(Path::new("1_run/out.txt")).unwrap(),
            "hello\n"
        );
    }

    #[test]
    fn exec_captures_failure_status() {
        let (_dir, ws) = workspace();
        let output = ws.exec("exit 3", Path::new("")).unwrap();
        assert!(!output.success());
        assert_eq!(output.status_code, Some(3));
    }

    #[test]
    fn rename_moves_files() {
        let (_dir, ws) = workspace();
        ws.write(Path::new("old.log"), "x").unwrap();
        ws.rename(Path::new("old.log"), Path::new("new.log")).unwrap();
        assert!(!ws.exists(Path::new("old.log")));
        assert!(ws.is_file(Path::new("new.log")));
    }
}
