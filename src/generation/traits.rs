//! Port interfaces for the generation domain

use async_trait::async_trait;
use std::path::Path;

use crate::generation::{GenerationError, TemplateData, TemplateId};

/// Renders a named template against the rendering context.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: TemplateId, data: &TemplateData) -> Result<Vec<u8>, GenerationError>;
}

/// Normalizes generated source before it is written.
pub trait SourceFormatter: Send + Sync {
    /// `path` is only used to label errors.
    fn format(&self, path: &Path, source: &[u8]) -> Result<Vec<u8>, GenerationError>;
}

/// Filesystem operations the generator performs
#[async_trait]
pub trait OutputService: Send + Sync {
    /// Create a directory and its parents; existing directories are fine
    async fn ensure_directory(&self, path: &Path) -> Result<(), GenerationError>;

    /// Recursively remove a directory; a missing directory is not an error
    async fn remove_tree(&self, path: &Path) -> Result<(), GenerationError>;

    /// Write `content` to `path`, replacing any existing file
    async fn write_file(&self, path: &Path, content: &[u8]) -> Result<(), GenerationError>;

    async fn exists(&self, path: &Path) -> bool;
}
