//! Run options collected from the command line

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use tracing::debug;

use crate::application::ApplicationError;
use crate::application::scaffold::{Features, default_config};
use crate::config::defaults::{DEFAULT_HTTP_PORT, DEFAULT_OUTPUT_DIR, DEFAULT_SERVER_NAME};
use crate::config::{Config, ConfigInput, TransportKind, load_config_file};

/// Transport accepted by `--transport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    Stdio,
    Http,
}

impl From<TransportArg> for TransportKind {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Stdio => TransportKind::Stdio,
            TransportArg::Http => TransportKind::Http,
        }
    }
}

/// Flags for one generation run.
#[derive(Debug, Clone, Args)]
pub struct RunOptions {
    /// Server name
    #[arg(long)]
    pub name: Option<String>,

    /// Transport the generated server uses
    #[arg(long, value_enum, ignore_case = true)]
    pub transport: Option<TransportArg>,

    /// HTTP port for the http transport
    #[arg(long)]
    pub port: Option<i64>,

    /// Server version reported by the generated server
    #[arg(long = "server-version")]
    pub server_version: Option<String>,

    /// Module path of the generated project
    #[arg(long)]
    pub module: Option<String>,

    /// Output directory; the generated subtrees inside it are replaced on every run
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Load the full server config from a TOML or YAML file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Generate tool stubs
    #[arg(long, num_args = 0..=1, default_value_t = true, default_missing_value = "true", action = clap::ArgAction::Set)]
    pub with_tools: bool,

    /// Generate prompt stubs
    #[arg(long, num_args = 0..=1, default_value_t = true, default_missing_value = "true", action = clap::ArgAction::Set)]
    pub with_prompts: bool,

    /// Generate resource stubs
    #[arg(long, num_args = 0..=1, default_value_t = true, default_missing_value = "true", action = clap::ArgAction::Set)]
    pub with_resources: bool,

    /// Skip inspector checks
    #[arg(long)]
    pub no_inspector: bool,

    /// Skip cargo fmt/build/clippy/test on the generated project
    #[arg(long)]
    pub skip_checks: bool,

    /// Print the plan without generating files
    #[arg(long)]
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            name: None,
            transport: None,
            port: None,
            server_version: None,
            module: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            config: None,
            with_tools: true,
            with_prompts: true,
            with_resources: true,
            no_inspector: false,
            skip_checks: false,
            dry_run: false,
        }
    }
}

impl RunOptions {
    fn features(&self) -> Features {
        Features {
            tools: self.with_tools,
            resources: self.with_resources,
            prompts: self.with_prompts,
        }
    }
}

/// A validated config plus what the rest of the run should do with it.
#[derive(Debug, Clone)]
pub struct ConfigRun {
    pub config: Config,
    pub out_dir: PathBuf,
    pub should_inspect: bool,
    pub dry_run: bool,
    pub run_checks: bool,
}

/// Turns run options into a validated config.
///
/// With `--config` the file supplies every collection and the feature flags
/// are ignored; explicit `--name`, `--transport`, `--port`,
/// `--server-version` and `--module` still override the file.
pub async fn resolve(
    opts: &RunOptions,
    can_run_inspector: bool,
) -> Result<ConfigRun, ApplicationError> {
    let name = match opts.name.as_deref().map(str::trim) {
        Some("") => {
            return Err(ApplicationError::InvalidOption(
                "--name cannot be empty".to_string(),
            ));
        }
        other => other,
    };

    let mut input = match &opts.config {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            load_config_file(path).await?
        }
        None => default_config(
            DEFAULT_SERVER_NAME,
            opts.transport.map(Into::into).unwrap_or_default(),
            opts.port.unwrap_or(DEFAULT_HTTP_PORT),
            opts.features(),
        ),
    };

    apply_overrides(&mut input, opts, name);
    let config = input.validate()?;

    Ok(ConfigRun {
        config,
        out_dir: opts.output_dir.clone(),
        should_inspect: can_run_inspector && !opts.no_inspector,
        dry_run: opts.dry_run,
        run_checks: !opts.skip_checks,
    })
}

fn apply_overrides(input: &mut ConfigInput, opts: &RunOptions, name: Option<&str>) {
    if let Some(name) = name {
        input.server.name = name.to_string();
    }
    if let Some(transport) = opts.transport {
        input.transport.kind = TransportKind::from(transport).as_str().to_string();
    }
    if let Some(port) = opts.port {
        input.transport.http_port = port;
    }
    if let Some(version) = &opts.server_version {
        input.server.version = version.trim().to_string();
    }
    if let Some(module) = &opts.module {
        input.server.module = module.trim().to_string();
    }
}
