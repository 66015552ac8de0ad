//! Core types for the generation domain

use std::fmt;
use std::path::{Path, PathBuf};

/// Named templates the generator knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    CargoManifest,
    Readme,
    Main,
    Lib,
    Instructions,
    Tools,
    ToolHandlers,
    ToolHandlersTests,
    Prompts,
    PromptsTests,
    Resources,
    ResourcesTests,
    Stubs,
}

impl TemplateId {
    /// Path of the template inside the embedded template folder.
    pub fn template_path(&self) -> &'static str {
        match self {
            TemplateId::CargoManifest => "server/cargo.toml.tera",
            TemplateId::Readme => "server/readme.md.tera",
            TemplateId::Main => "server/main.rs.tera",
            TemplateId::Lib => "server/lib.rs.tera",
            TemplateId::Instructions => "server/instructions.rs.tera",
            TemplateId::Tools => "server/tools.rs.tera",
            TemplateId::ToolHandlers => "server/handlers.rs.tera",
            TemplateId::ToolHandlersTests => "server/handlers_tests.rs.tera",
            TemplateId::Prompts => "server/prompts.rs.tera",
            TemplateId::PromptsTests => "server/prompts_tests.rs.tera",
            TemplateId::Resources => "server/resources.rs.tera",
            TemplateId::ResourcesTests => "server/resources_tests.rs.tera",
            TemplateId::Stubs => "server/stubs.rs.tera",
        }
    }

    pub fn all() -> [TemplateId; 13] {
        [
            TemplateId::CargoManifest,
            TemplateId::Readme,
            TemplateId::Main,
            TemplateId::Lib,
            TemplateId::Instructions,
            TemplateId::Tools,
            TemplateId::ToolHandlers,
            TemplateId::ToolHandlersTests,
            TemplateId::Prompts,
            TemplateId::PromptsTests,
            TemplateId::Resources,
            TemplateId::ResourcesTests,
            TemplateId::Stubs,
        ]
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_path())
    }
}

/// One template rendered to one destination relative to the output dir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    pub template: TemplateId,
    pub destination: PathBuf,
    /// When false an existing destination is left untouched.
    pub overwrite: bool,
}

impl FileJob {
    pub fn new(template: TemplateId, destination: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            template,
            destination: destination.into(),
            overwrite,
        }
    }

    /// Rust sources go through the formatter before they are written.
    pub fn is_rust_source(&self) -> bool {
        is_rust_source(&self.destination)
    }
}

pub fn is_rust_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "rs")
}

/// What a generation run did on disk, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}
