//! Error types for the generation domain

use std::path::PathBuf;
use thiserror::Error;

use crate::generation::TemplateId;

/// Errors that can occur while generating a server scaffold
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("config is missing")]
    ConfigMissing,

    #[error("out dir is required")]
    OutDirEmpty,

    #[error("unsafe output directory {}: {reason}", .path.display())]
    OutDirUnsafe { path: PathBuf, reason: String },

    #[error("could not create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write file {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not clean up {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not render template {template}: {message}")]
    Render { template: TemplateId, message: String },

    #[error("could not format {}: {message}", .path.display())]
    Format { path: PathBuf, message: String },
}

impl GenerationError {
    pub fn unsafe_out_dir(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::OutDirUnsafe {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for precondition failures raised before anything on disk changed.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissing | Self::OutDirEmpty | Self::OutDirUnsafe { .. }
        )
    }
}
