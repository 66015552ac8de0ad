//! Runs cargo's standard checks against a freshly generated project

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::application::ApplicationError;
use crate::infrastructure::shell::{CommandExecutor, CommandLine};

/// Upper bound for a single check step; a cold `cargo build` dominates.
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckStep {
    pub label: String,
    pub command: CommandLine,
}

impl CheckStep {
    pub fn cargo(args: &[&str]) -> Self {
        let command = CommandLine::new("cargo", args.iter().copied());
        Self {
            label: command.to_string(),
            command,
        }
    }
}

/// The fixed check sequence, in run order.
pub fn steps() -> Vec<CheckStep> {
    vec![
        CheckStep::cargo(&["fmt", "--all"]),
        CheckStep::cargo(&["build"]),
        CheckStep::cargo(&["clippy", "--all-targets"]),
        CheckStep::cargo(&["test"]),
    ]
}

pub async fn run(out_dir: &Path, executor: &dyn CommandExecutor) -> Result<(), ApplicationError> {
    run_with_timeout(out_dir, executor, CHECK_TIMEOUT).await
}

/// Runs every step in order and stops at the first failure.
pub async fn run_with_timeout(
    out_dir: &Path,
    executor: &dyn CommandExecutor,
    timeout: Duration,
) -> Result<(), ApplicationError> {
    for step in steps() {
        run_step(&step, out_dir, executor, timeout).await?;
    }

    info!(out_dir = %out_dir.display(), "all checks passed");
    Ok(())
}

/// Runs one step under `timeout`; a non-zero exit is `CheckFailed`.
pub async fn run_step(
    step: &CheckStep,
    out_dir: &Path,
    executor: &dyn CommandExecutor,
    timeout: Duration,
) -> Result<(), ApplicationError> {
    println!("Running: {}", step.label);

    let result = tokio::time::timeout(timeout, executor.execute(&step.command, out_dir))
        .await
        .map_err(|_| ApplicationError::CheckTimeout {
            step: step.label.clone(),
            timeout,
        })??;

    if !result.stdout.is_empty() {
        debug!(step = %step.label, stdout = %result.stdout.trim_end(), "check output");
    }

    if !result.is_success() {
        return Err(ApplicationError::CheckFailed {
            step: step.label.clone(),
            exit_code: result.exit_code,
            stderr: result.stderr.trim_end().to_string(),
        });
    }
    Ok(())
}
