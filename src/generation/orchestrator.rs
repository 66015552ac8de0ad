//! Generation orchestration - turns a validated config into a project tree

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::utils::server_file_token;
use crate::generation::{
    FileJob, GenerationError, GenerationReport, OutputService, SourceFormatter, TemplateData,
    TemplateId, TemplateRenderer, build_context, identifier_collisions,
};
use crate::infrastructure::generation::{RustSourceFormatter, TeraTemplateRenderer};
use crate::infrastructure::output::FileSystemOutputService;

/// Directory holding one entry point per server.
pub const CMD_DIR: &str = "cmd";

/// Root of the generated application code.
pub fn app_dir() -> PathBuf {
    Path::new("internal").join("mcpapp")
}

/// Subtrees owned by the generator and removed on every run.
pub fn generated_subtrees() -> [PathBuf; 2] {
    [PathBuf::from(CMD_DIR), app_dir()]
}

/// Generates a server scaffold under `out_dir`.
pub struct Generator<'a> {
    config: Option<&'a Config>,
    out_dir: PathBuf,
    renderer: Arc<dyn TemplateRenderer>,
    formatter: Arc<dyn SourceFormatter>,
    output: Arc<dyn OutputService>,
}

impl<'a> Generator<'a> {
    /// Uses the embedded Tera templates, the Rust formatter and the local filesystem.
    pub fn new(config: Option<&'a Config>, out_dir: impl Into<PathBuf>) -> Self {
        Self::with_parts(
            config,
            out_dir,
            Arc::new(TeraTemplateRenderer::new()),
            Arc::new(RustSourceFormatter::new()),
            Arc::new(FileSystemOutputService::new()),
        )
    }

    pub fn with_parts(
        config: Option<&'a Config>,
        out_dir: impl Into<PathBuf>,
        renderer: Arc<dyn TemplateRenderer>,
        formatter: Arc<dyn SourceFormatter>,
        output: Arc<dyn OutputService>,
    ) -> Self {
        Self {
            config,
            out_dir: out_dir.into(),
            renderer,
            formatter,
            output,
        }
    }

    /// Runs the whole pipeline. Any failure aborts the remaining steps; a
    /// partially written tree is replaced by the next successful run.
    pub async fn run(&self) -> Result<GenerationReport, GenerationError> {
        let config = self.config.ok_or(GenerationError::ConfigMissing)?;
        check_out_dir(&self.out_dir)?;

        let server_name = server_file_token(&config.server.name);
        info!(
            out_dir = %self.out_dir.display(),
            server = %server_name,
            "generating MCP server"
        );

        self.cleanup_generated().await?;
        self.ensure_output_dirs(&server_name).await?;

        let data = build_context(config, &server_name);
        for collision in identifier_collisions(&data) {
            warn!(
                collection = collision.collection,
                ident = %collision.ident,
                ids = ?collision.ids,
                "distinct ids produce the same generated identifier"
            );
        }

        let mut report = GenerationReport::default();
        for job in required_jobs(&server_name)
            .into_iter()
            .chain(optional_jobs(&data))
        {
            self.write_job(&job, &data, &mut report).await?;
        }

        info!(
            written = report.written.len(),
            skipped = report.skipped.len(),
            "generation complete"
        );
        Ok(report)
    }

    async fn cleanup_generated(&self) -> Result<(), GenerationError> {
        for subtree in generated_subtrees() {
            let path = self.out_dir.join(subtree);
            debug!(path = %path.display(), "removing generated subtree");
            self.output.remove_tree(&path).await?;
        }
        Ok(())
    }

    async fn ensure_output_dirs(&self, server_name: &str) -> Result<(), GenerationError> {
        for dir in output_dirs(server_name) {
            self.output.ensure_directory(&self.out_dir.join(dir)).await?;
        }
        Ok(())
    }

    async fn write_job(
        &self,
        job: &FileJob,
        data: &TemplateData,
        report: &mut GenerationReport,
    ) -> Result<(), GenerationError> {
        let path = self.out_dir.join(&job.destination);

        if !job.overwrite && self.output.exists(&path).await {
            info!(path = %path.display(), "keeping existing file");
            report.skipped.push(path);
            return Ok(());
        }

        let mut content = self.renderer.render(job.template, data)?;
        if job.is_rust_source() {
            content = self.formatter.format(&path, &content)?;
        }

        self.output.write_file(&path, &content).await?;
        debug!(path = %path.display(), template = %job.template, "wrote file");
        report.written.push(path);
        Ok(())
    }
}

/// Directories created before any file is written, relative to the out dir.
pub fn output_dirs(server_name: &str) -> Vec<PathBuf> {
    let app = app_dir();
    vec![
        Path::new(CMD_DIR).join(server_name),
        app.clone(),
        app.join("tools"),
        app.join("tools").join("handlers"),
        app.join("prompts"),
        app.join("resources"),
        app.join("stubs"),
    ]
}

/// Files every run produces.
pub fn required_jobs(server_name: &str) -> Vec<FileJob> {
    let app = app_dir();
    vec![
        FileJob::new(TemplateId::CargoManifest, "Cargo.toml", false),
        FileJob::new(TemplateId::Readme, "README.md", false),
        FileJob::new(
            TemplateId::Main,
            Path::new(CMD_DIR).join(server_name).join("main.rs"),
            true,
        ),
        FileJob::new(TemplateId::Lib, app.join("lib.rs"), true),
        FileJob::new(TemplateId::Instructions, app.join("instructions.rs"), true),
        FileJob::new(TemplateId::Tools, app.join("tools").join("mod.rs"), true),
        FileJob::new(
            TemplateId::ToolHandlers,
            app.join("tools").join("handlers").join("mod.rs"),
            true,
        ),
        FileJob::new(TemplateId::Prompts, app.join("prompts").join("mod.rs"), true),
        FileJob::new(TemplateId::Resources, app.join("resources").join("mod.rs"), true),
        FileJob::new(TemplateId::Stubs, app.join("stubs").join("mod.rs"), true),
    ]
}

/// Test files, one per non-empty entity collection.
pub fn optional_jobs(data: &TemplateData) -> Vec<FileJob> {
    let app = app_dir();
    let candidates = [
        (
            TemplateId::ToolHandlersTests,
            app.join("tools").join("handlers").join("tests.rs"),
            !data.tools.is_empty(),
        ),
        (
            TemplateId::PromptsTests,
            app.join("prompts").join("tests.rs"),
            !data.prompts.is_empty(),
        ),
        (
            TemplateId::ResourcesTests,
            app.join("resources").join("tests.rs"),
            !data.resources.is_empty(),
        ),
    ];

    candidates
        .into_iter()
        .filter(|(_, _, wanted)| *wanted)
        .map(|(template, destination, _)| FileJob::new(template, destination, true))
        .collect()
}

/// Refuses output directories the cleanup step must never touch.
pub fn check_out_dir(out_dir: &Path) -> Result<(), GenerationError> {
    if out_dir.as_os_str().is_empty() {
        return Err(GenerationError::OutDirEmpty);
    }

    let cleaned = clean_path(out_dir);
    if cleaned == Path::new(".") {
        return Err(GenerationError::unsafe_out_dir(out_dir, "current directory"));
    }

    let cwd = std::env::current_dir().map_err(|e| {
        GenerationError::unsafe_out_dir(
            out_dir,
            format!("could not resolve current working directory: {e}"),
        )
    })?;

    let absolute = if cleaned.is_absolute() {
        cleaned
    } else {
        clean_path(&cwd.join(cleaned))
    };

    if absolute.parent().is_none() {
        return Err(GenerationError::unsafe_out_dir(out_dir, "filesystem root"));
    }
    if absolute == cwd {
        return Err(GenerationError::unsafe_out_dir(
            out_dir,
            "current working directory",
        ));
    }

    if absolute.exists() {
        if !absolute.is_dir() {
            return Err(GenerationError::unsafe_out_dir(out_dir, "not a directory"));
        }
        if let (Ok(real), Ok(real_cwd)) = (absolute.canonicalize(), cwd.canonicalize()) {
            if real == real_cwd || real.parent().is_none() {
                return Err(GenerationError::unsafe_out_dir(
                    out_dir,
                    "resolves to the current working directory or filesystem root",
                ));
            }
        }
    }

    for subtree in generated_subtrees() {
        if cwd.starts_with(absolute.join(subtree)) {
            return Err(GenerationError::unsafe_out_dir(
                out_dir,
                "cleanup would remove the current working directory",
            ));
        }
    }

    Ok(())
}

/// Lexically normalizes a path: drops `.` and folds `..` where possible.
/// An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
            Component::RootDir | Component::Prefix(_) => out.push(component.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}
