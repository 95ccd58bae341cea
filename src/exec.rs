//! Shell command execution.
use anyhow::{Context as _, Result};
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// Standard output followed by standard error, as a user would have seen
    /// them in a terminal.
    #[must_use]
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout.clone();
        out.push_str(&self.stderr);
        out
    }
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs shell scripts on behalf of command units.
///
/// Implementations never fail on a non-zero exit; the caller inspects
/// [`ExecResult::success`].  An `Err` means the shell could not be spawned.
#[cfg_attr(test, mockall::automock)]
pub trait Executor: Send + Sync {
    /// Run `script` through `sh -c`, capturing its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell process cannot be started.
    fn run_shell(&self, script: &str) -> Result<ExecResult>;
}

/// [`Executor`] backed by real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_shell(&self, script: &str) -> Result<ExecResult> {
        run_unchecked("sh", &["-c", script])
    }
}

/// Run a command, allowing failure (returns result without bailing).
///
/// # Errors
///
/// Returns an error if the program cannot be spawned.
pub fn run_unchecked(program: &str, args: &[&str]) -> Result<ExecResult> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("failed to execute: {program}"))?;

    Ok(ExecResult::from(output))
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn run_shell_captures_stdout() {
        let result = SystemExecutor.run_shell("echo hello").unwrap();
        assert!(result.success, "echo should succeed");
        assert_eq!(result.stdout.trim(), "hello");
        assert_eq!(result.code, Some(0));
    }

    #[test]
    fn run_shell_reports_failure_without_error() {
        let result = SystemExecutor.run_shell("echo oops >&2; exit 3").unwrap();
        assert!(!result.success, "non-zero exit should set success=false");
        assert_eq!(result.code, Some(3));
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[test]
    fn combined_output_joins_streams() {
        let result = SystemExecutor
            .run_shell("echo out; echo err >&2")
            .unwrap();
        assert_eq!(result.combined_output(), "out\nerr\n");
    }

    #[test]
    fn run_unchecked_missing_program_is_error() {
        let result = run_unchecked("this-program-does-not-exist-12345", &[]);
        assert!(result.is_err(), "spawn failure should be an error");
    }
}
