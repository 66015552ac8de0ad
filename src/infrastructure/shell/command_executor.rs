//! Command executor for running external processes
//!
//! Verification checks and inspector calls go through [`CommandExecutor`] so
//! they can be exercised without spawning real processes.

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// A command could not be started.
#[derive(Debug, Error)]
#[error("failed to execute command '{command}': {source}")]
pub struct CommandError {
    pub command: String,
    #[source]
    pub source: std::io::Error,
}

/// A program and its arguments, run without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Trait for executing external commands
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute a command in the given working directory and wait for it
    async fn execute(
        &self,
        command: &CommandLine,
        working_dir: &Path,
    ) -> Result<CommandResult, CommandError>;
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Check if the command was successful
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Default command executor using tokio::process
///
/// The child is killed if the returned future is dropped, so callers can
/// enforce a timeout by racing it.
pub struct ProcessCommandExecutor;

impl ProcessCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcessCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ProcessCommandExecutor {
    async fn execute(
        &self,
        command: &CommandLine,
        working_dir: &Path,
    ) -> Result<CommandResult, CommandError> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| CommandError {
                command: command.to_string(),
                source,
            })?;

        Ok(CommandResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Mock command executor for testing
#[cfg(test)]
pub struct MockCommandExecutor {
    pub results: std::collections::HashMap<String, CommandResult>,
    pub calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self {
            results: std::collections::HashMap::new(),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_result(
        mut self,
        command: &str,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        self.results.insert(
            command.to_string(),
            CommandResult {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Commands executed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl CommandExecutor for MockCommandExecutor {
    async fn execute(
        &self,
        command: &CommandLine,
        _working_dir: &Path,
    ) -> Result<CommandResult, CommandError> {
        let key = command.to_string();
        self.calls.lock().unwrap().push(key.clone());
        self.results
            .get(&key)
            .cloned()
            .ok_or_else(|| CommandError {
                command: key,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "mock executor has no result for command",
                ),
            })
    }
}
