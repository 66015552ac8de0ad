//! Error types for configuration validation and loading

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which part of the config a violation was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Server,
    Tools,
    Resources,
    Prompts,
    Transport,
}

/// One condition validation could not repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub section: Section,
    pub message: String,
}

impl Violation {
    pub fn new(section: Section, message: impl Into<String>) -> Self {
        Self {
            section,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Aggregate of every violation found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_messages(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Violations raised by one section, in the order they were found.
    pub fn in_section(&self, section: Section) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.section == section)
    }
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while reading a config file from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse YAML config {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported config file extension for {} (expected .toml, .yml or .yaml)", .0.display())]
    UnsupportedFormat(PathBuf),
}
