//! SSH workspace implementation
//!
//! Implements the workspace port against a remote host. Every operation is a
//! single `ssh` invocation; file content travels over stdin. There is no
//! persistent connection and no retry.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::domain::ports::workspace::{CommandOutput, Workspace, WsError, WsResult};
use crate::domain::run::RemoteHost;

/// Workspace rooted at a directory on an SSH host
pub struct SshWorkspace {
    /// `user@host` destination as understood by ssh
    destination: String,
    port: u16,
    root: PathBuf,
}

impl SshWorkspace {
    /// Open a workspace, creating the remote root directory if needed
    pub fn open(host: &RemoteHost, root: &Path) -> WsResult<Self> {
        let workspace = Self {
            destination: host.destination(),
            port: host.port,
            root: root.to_path_buf(),
        };
        workspace.run_checked(&format!("mkdir -p {}", quote(root)), None)?;
        Ok(workspace)
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    fn rooted(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Run a command on the remote host via ssh
    fn run(&self, command: &str, input: Option<&str>) -> WsResult<Output> {
        let mut child = Command::new("ssh")
            .arg("-p")
            .arg(self.port.to_string())
            .arg(&self.destination)
            .arg(command)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(content) = input {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(content.as_bytes())?;
            }
        }

        Ok(child.wait_with_output()?)
    }

    /// Run a command that must succeed; returns its stdout
    fn run_checked(&self, command: &str, input: Option<&str>) -> WsResult<String> {
        let output = self.run(command, input)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WsError::Remote(format!(
                "{}: {}",
                command,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// `test`-style probe; a transport failure reads as "no"
    fn probe(&self, command: &str) -> bool {
        self.run(command, None)
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

/// Quote a path for safe use in a remote shell command
fn quote(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', "'\\''"))
}

impl Workspace for SshWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, path: &Path) -> bool {
        self.probe(&format!("test -e {}", quote(&self.rooted(path))))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.probe(&format!("test -f {}", quote(&self.rooted(path))))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.probe(&format!("test -d {}", quote(&self.rooted(path))))
    }

    fn create_dir_all(&self, path: &Path) -> WsResult<()> {
        self.run_checked(&format!("mkdir -p {}", quote(&self.rooted(path))), None)?;
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> WsResult<()> {
        self.run_checked(&format!("rm -rf {}", quote(&self.rooted(path))), None)?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> WsResult<()> {
        self.run_checked(&format!("rm -f {}", quote(&self.rooted(path))), None)?;
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> WsResult<String> {
        self.run_checked(&format!("cat {}", quote(&self.rooted(path))), None)
    }

    fn write(&self, path: &Path, content: &str) -> WsResult<()> {
        let full = self.rooted(path);
        let parent = full.parent().map(quote);
        let command = match parent {
            Some(parent) => format!("mkdir -p {} && cat > {}", parent, quote(&full)),
            None => format!("cat > {}", quote(&full)),
        };
        self.run_checked(&command, Some(content))?;
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> WsResult<()> {
        self.run_checked(
            &format!(
                "mv {} {}",
                quote(&self.rooted(from)),
                quote(&self.rooted(to))
            ),
            None,
        )?;
        Ok(())
    }

    fn glob(&self, pattern: &str) -> WsResult<Vec<PathBuf>> {
        // The pattern is expanded by the remote shell, so it is deliberately
        // left unquoted. No matches is not an error.
        let command = format!(
            "cd {} && ls -1d {} 2>/dev/null",
            quote(&self.root),
            pattern
        );
        let output = self.run(&command, None)?;
        if !output.status.success() {
            return Ok(Vec::new());
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect())
    }

    fn absolute(&self, path: &Path) -> WsResult<PathBuf> {
        let pwd = self.run_checked(
            &format!("cd {} && pwd", quote(&self.rooted(path))),
            None,
        )?;
        Ok(PathBuf::from(pwd.trim()))
    }

    fn exec(&self, command: &str, cwd: &Path) -> WsResult<CommandOutput> {
        let wrapped = format!("cd {} && {}", quote(&self.rooted(cwd)), command);
        let output = self.run(&wrapped, None)?;
        Ok(CommandOutput {
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
