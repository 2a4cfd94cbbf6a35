//! Subprocess execution with captured output.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

use crate::error::Error;

/// A subprocess invocation whose output is captured.
///
/// The environment overlay is merged onto the parent environment, never
/// replacing it, and stdin is closed so external tools cannot block on
/// interactive prompts.
pub struct Cmd {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl Cmd {
    /// Start building an invocation of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Append a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add one environment variable on top of the parent environment.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Render the command line for logs and error messages.
    fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Run the command and return its captured stdout.
    ///
    /// No timeout is imposed here; callers that need a bounded wait wrap the
    /// invocation in the retry gate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandFailed`] with the captured output when the
    /// subprocess exits non-zero, or a spawn error when the program cannot be
    /// executed at all.
    pub async fn run(&self) -> Result<String> {
        debug!(command = %self.display(), "Running command");

        let mut command = Command::new(&self.program);
        command.args(&self.args).stdin(Stdio::null());
        if let Some(ref dir) = self.cwd {
            command.current_dir(dir);
        }
        for (key, value) in &self.env {
            command.env(key, value);
        }

        let output = command
            .output()
            .await
            .with_context(|| format!("Failed to execute `{}`", self.program))?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: self.display(),
                status: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout() {
        let out = Cmd::new("echo").arg("hello").run().await.unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[tokio::test]
    async fn nonzero_exit_maps_to_command_failed() {
        let err = Cmd::new("sh")
            .args(["-c", "echo oops >&2; exit 3"])
            .run()
            .await
            .unwrap_err();

        let err = err.downcast::<Error>().unwrap();
        match err {
            Error::CommandFailed { status, stderr, .. } => {
                assert_eq!(status, 3);
                assert!(stderr.contains("oops"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn env_overlay_merges_onto_parent_environment() {
        // PATH must survive the overlay or `sh` itself would not resolve.
        let out = Cmd::new("sh")
            .args(["-c", "printf %s \"$L8K_TEST_VAR\""])
            .env("L8K_TEST_VAR", "overlay")
            .run()
            .await
            .unwrap();
        assert_eq!(out, "overlay");
    }

    #[tokio::test]
    async fn runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = Cmd::new("pwd")
            .current_dir(dir.path())
            .run()
            .await
            .unwrap();
        let reported = std::fs::canonicalize(out.trim()).unwrap();
        let expected = std::fs::canonicalize(dir.path()).unwrap();
        assert_eq!(reported, expected);
    }
}
