//! Filesystem-based output service implementation

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::generation::{GenerationError, OutputService};

/// Output service that writes generated files to the local filesystem
pub struct FileSystemOutputService;

impl FileSystemOutputService {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemOutputService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutputService for FileSystemOutputService {
    async fn ensure_directory(&self, path: &Path) -> Result<(), GenerationError> {
        fs::create_dir_all(path)
            .await
            .map_err(|source| GenerationError::CreateDir {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn remove_tree(&self, path: &Path) -> Result<(), GenerationError> {
        match fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(GenerationError::Cleanup {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> Result<(), GenerationError> {
        let write_err = |source| GenerationError::WriteFile {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            self.ensure_directory(parent).await?;
        }

        let mut file = fs::File::create(path).await.map_err(write_err)?;
        file.write_all(content).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;
        Ok(())
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }
}
