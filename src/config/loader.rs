//! Reads a [`ConfigInput`] from a TOML or YAML file.

use std::path::Path;

use tracing::debug;

use crate::config::{ConfigInput, LoadError};

/// Loads a config file, choosing the parser from the file extension.
pub async fn load_config_file(path: &Path) -> Result<ConfigInput, LoadError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), bytes = content.len(), "read config file");
    parse_config(path, &content)
}

/// Parses `content` as the format implied by `path`'s extension.
pub fn parse_config(path: &Path, content: &str) -> Result<ConfigInput, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("toml") => toml::from_str(content).map_err(|source| LoadError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        Some("yml" | "yaml") => {
            if content.trim().is_empty() {
                return Ok(ConfigInput::default());
            }
            serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    }
}
