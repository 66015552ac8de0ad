//! Application layer error types

use std::time::Duration;
use thiserror::Error;

use crate::config::{LoadError, ValidationError};
use crate::generation::GenerationError;
use crate::infrastructure::shell::CommandError;

/// Application layer errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("could not load config: {0}")]
    Load(#[from] LoadError),

    #[error("could not validate config: {0}")]
    Validation(#[from] ValidationError),

    #[error("could not generate server: {0}")]
    Generation(#[from] GenerationError),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("{step} failed with exit code {exit_code}: {stderr}")]
    CheckFailed {
        step: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("{step} timed out after {}s", .timeout.as_secs())]
    CheckTimeout { step: String, timeout: Duration },

    #[error("{method} failed with exit code {exit_code}: {stderr}")]
    InspectorFailed {
        method: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("port {port} not reachable within {}s", .timeout.as_secs())]
    PortUnreachable { port: i64, timeout: Duration },
}
