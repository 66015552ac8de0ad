//! mcpgen CLI entrypoint
//! Parses flags, validates the config and drives generation, checks and the inspector.
#![deny(unsafe_code)]

use std::io::IsTerminal;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use mcpgen::application::{ConfigRun, RunOptions, checks, inspector, resolve, scaffold};
use mcpgen::generation::Generator;
use mcpgen::infrastructure::shell::ProcessCommandExecutor;

#[derive(Parser)]
#[command(name = "mcpgen")]
#[command(author, version, about = "Generate a new Rust MCP server from flags or a config file")]
#[command(after_help = "Examples:
  mcpgen --name weather --transport stdio
  mcpgen --name weather --transport http --no-inspector
  mcpgen --dry-run --name weather
  mcpgen --config server.toml --output-dir ./weather

Inspector checks run only when stdin is a terminal.")]
struct Cli {
    #[command(flatten)]
    run: RunOptions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let can_run_inspector = std::io::stdin().is_terminal();

    let run = resolve(&cli.run, can_run_inspector).await?;
    print!("{}", scaffold::summary(&run.config, &run.out_dir));

    if run.dry_run {
        println!("Dry run enabled. Skipping generation, checks, and inspector.");
        return Ok(());
    }

    generate(&run).await
}

async fn generate(run: &ConfigRun) -> anyhow::Result<()> {
    let report = Generator::new(Some(&run.config), &run.out_dir)
        .run()
        .await
        .with_context(|| format!("failed to generate server in {}", run.out_dir.display()))?;
    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "generation finished"
    );

    let executor = ProcessCommandExecutor::new();
    if run.run_checks {
        checks::run(&run.out_dir, &executor)
            .await
            .context("generated project failed its checks")?;
    }

    if run.should_inspect {
        inspector::run(&run.config, &run.out_dir, &executor)
            .await
            .context("inspector checks failed")?;
    }

    print!("{}", scaffold::inspector_hint(&run.config, &run.out_dir));
    Ok(())
}
