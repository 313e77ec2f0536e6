//! External command execution behind an injectable [`Executor`].
use anyhow::{Context as _, Result, bail};
use std::path::PathBuf;
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the command exited successfully.
    pub success: bool,
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
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

/// Runs external programs.
///
/// Tasks go through this trait rather than [`std::process`] so tests can
/// substitute `MockExecutor`.
#[cfg_attr(test, mockall::automock)]
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run `program` and return its output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started or exits non-zero.
    fn run(&self, program: &str, args: &[String]) -> Result<ExecResult>;

    /// Run `program`, returning its output even when it exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be started.
    fn run_unchecked(&self, program: &str, args: &[String]) -> Result<ExecResult>;

    /// Locate `program` on `PATH`.
    fn which(&self, program: &str) -> Option<PathBuf>;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[String]) -> Result<ExecResult> {
        let result = self.run_unchecked(program, args)?;
        if !result.success {
            bail!(
                "{program} failed (exit {}): {}",
                result.code.unwrap_or(-1),
                result.stderr.trim()
            );
        }
        Ok(result)
    }

    fn run_unchecked(&self, program: &str, args: &[String]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}
