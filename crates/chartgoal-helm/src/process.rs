//! Subprocess execution
//!
//! Goals talk to helm exclusively through [`CommandRunner`], so executors
//! can be exercised against [`crate::MockCommandRunner`] without a helm
//! binary or a cluster.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;

use crate::error::{GoalError, Result};

/// Options for a spawned command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnOptions {
    /// Working directory
    pub cwd: Option<PathBuf>,

    /// Additional environment variables
    pub env: HashMap<String, String>,

    /// Log the full command line instead of just the subcommand
    pub log_command: bool,
}

impl SpawnOptions {
    pub fn in_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn logging_command(mut self, log_command: bool) -> Self {
        self.log_command = log_command;
        self
    }
}

/// Result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Turn a non-zero exit into a [`GoalError::Subprocess`]
    pub fn check(self, message: impl Into<String>) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let mut message = message.into();
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            message = format!("{}\n{}", message, stderr);
        }
        Err(GoalError::Subprocess {
            code: self.code,
            message,
        })
    }
}

/// Runs external commands for a goal invocation
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command as a goal step, logging its output
    async fn spawn(&self, cmd: &str, args: &[String], options: &SpawnOptions)
    -> Result<ProcessOutput>;

    /// Run a query command and capture its output
    async fn exec(&self, cmd: &str, args: &[String]) -> Result<ProcessOutput> {
        self.spawn(cmd, args, &SpawnOptions::default()).await
    }
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn spawn(
        &self,
        cmd: &str,
        args: &[String],
        options: &SpawnOptions,
    ) -> Result<ProcessOutput> {
        log_command_line(cmd, args, options.log_command);

        let mut command = tokio::process::Command::new(cmd);
        command
            .args(args)
            .envs(&options.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &options.cwd {
            command.current_dir(cwd);
        }

        let output = command.output().await.map_err(|e| GoalError::Spawn {
            command: cmd.to_string(),
            message: e.to_string(),
        })?;

        let result = ProcessOutput {
            // Killed by a signal
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        for line in result.stdout.lines() {
            tracing::debug!(target: "chartgoal::helm::output", "{}", line);
        }
        for line in result.stderr.lines() {
            tracing::debug!(target: "chartgoal::helm::output", "{}", line);
        }
        tracing::debug!(cmd, code = result.code, "command finished");

        Ok(result)
    }
}

/// Log a command line according to the `logCommand` setting
pub(crate) fn log_command_line(cmd: &str, args: &[String], log_command: bool) {
    if log_command {
        tracing::info!("Executing {} {}", cmd, args.join(" "));
    } else {
        let subcommand = args.first().map(String::as_str).unwrap_or_default();
        tracing::info!("Executing {} {}", cmd, subcommand);
        tracing::debug!("Executing {} {}", cmd, args.join(" "));
    }
}
