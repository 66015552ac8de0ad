//! Live checks against the generated server through the MCP inspector CLI
//!
//! The server binary is built first so no call waits on a cold compile.
//! For the http transport the server is then started and the inspector
//! talks to `http://localhost:<port>/mcp`; for stdio the inspector launches
//! the server itself.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::application::ApplicationError;
use crate::application::checks::{self, CheckStep, CHECK_TIMEOUT};
use crate::config::{Config, TransportKind};
use crate::core::utils::{server_file_token, to_package_name};
use crate::infrastructure::shell::{CommandError, CommandExecutor, CommandLine};

pub const INSPECTOR_PACKAGE: &str = "@modelcontextprotocol/inspector";
pub const PORT_WAIT_TIMEOUT: Duration = Duration::from_secs(3);
pub const PORT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// One inspector invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorCall {
    pub method: &'static str,
    pub command: CommandLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorPlan {
    /// Builds the server binary before anything talks to it.
    pub build: CheckStep,
    /// Server to start before the calls; only set for http.
    pub server_command: Option<CommandLine>,
    pub port: Option<i64>,
    pub calls: Vec<InspectorCall>,
}

/// List methods for every non-empty collection.
pub fn methods(config: &Config) -> Vec<&'static str> {
    let mut methods = Vec::new();
    if !config.tools.is_empty() {
        methods.push("tools/list");
    }
    if !config.resources.is_empty() {
        methods.push("resources/list");
    }
    if !config.prompts.is_empty() {
        methods.push("prompts/list");
    }
    methods
}

/// `bin_name` is the Cargo binary name of the generated server.
pub fn plan(config: &Config, bin_name: &str) -> InspectorPlan {
    let build = CheckStep::cargo(&["build", "--bin", bin_name]);
    let server_run = ["run", "--quiet", "--bin", bin_name];

    match config.transport.kind {
        TransportKind::Http => {
            let url = format!("http://localhost:{}/mcp", config.transport.http_port);
            let calls = methods(config)
                .into_iter()
                .map(|method| InspectorCall {
                    method,
                    command: CommandLine::new(
                        "npx",
                        [
                            INSPECTOR_PACKAGE,
                            "--cli",
                            url.as_str(),
                            "--transport",
                            "http",
                            "--method",
                            method,
                        ],
                    ),
                })
                .collect();

            InspectorPlan {
                build,
                server_command: Some(CommandLine::new("cargo", server_run)),
                port: Some(config.transport.http_port),
                calls,
            }
        }
        TransportKind::Stdio => {
            let calls = methods(config)
                .into_iter()
                .map(|method| {
                    let mut args = vec![
                        INSPECTOR_PACKAGE,
                        "--cli",
                        "--transport",
                        "stdio",
                        "--method",
                        method,
                        "--",
                        "cargo",
                    ];
                    args.extend(server_run);
                    InspectorCall {
                        method,
                        command: CommandLine::new("npx", args),
                    }
                })
                .collect();

            InspectorPlan {
                build,
                server_command: None,
                port: None,
                calls,
            }
        }
    }
}

/// Runs every planned call; the first failing call aborts the rest.
pub async fn run(
    config: &Config,
    out_dir: &Path,
    executor: &dyn CommandExecutor,
) -> Result<(), ApplicationError> {
    let bin_name = to_package_name(&server_file_token(&config.server.name));
    let plan = plan(config, &bin_name);
    if plan.calls.is_empty() {
        info!("nothing to inspect");
        return Ok(());
    }

    checks::run_step(&plan.build, out_dir, executor, CHECK_TIMEOUT).await?;

    let names: Vec<&str> = plan.calls.iter().map(|c| c.method).collect();
    println!("Running inspector checks: {}", names.join(", "));
    println!("---");

    let mut server = None;
    if let (Some(command), Some(port)) = (&plan.server_command, plan.port) {
        server = Some(start_server(command, out_dir)?);
        wait_for_port(port, PORT_WAIT_TIMEOUT).await?;
    }

    let result = run_calls(&plan.calls, out_dir, executor).await;

    if let Some(mut child) = server {
        if let Err(e) = child.kill().await {
            warn!(error = %e, "could not stop server");
        }
    }

    result?;
    println!("All checks passed.");
    Ok(())
}

async fn run_calls(
    calls: &[InspectorCall],
    out_dir: &Path,
    executor: &dyn CommandExecutor,
) -> Result<(), ApplicationError> {
    for (i, call) in calls.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("→ {}", call.method);

        let result = executor.execute(&call.command, out_dir).await?;
        if !result.stdout.is_empty() {
            println!("{}", result.stdout.trim_end());
        }
        if !result.is_success() {
            return Err(ApplicationError::InspectorFailed {
                method: call.method.to_string(),
                exit_code: result.exit_code,
                stderr: result.stderr.trim_end().to_string(),
            });
        }
        println!("✓ {}", call.method);
    }
    Ok(())
}

fn start_server(command: &CommandLine, out_dir: &Path) -> Result<Child, CommandError> {
    debug!(command = %command, "starting server");
    Command::new(&command.program)
        .args(&command.args)
        .current_dir(out_dir)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| CommandError {
            command: command.to_string(),
            source,
        })
}

/// Polls `127.0.0.1:<port>` until it accepts a connection.
pub async fn wait_for_port(port: i64, timeout: Duration) -> Result<(), ApplicationError> {
    let address = format!("127.0.0.1:{port}");

    let poll = async {
        loop {
            if TcpStream::connect(&address).await.is_ok() {
                return;
            }
            tokio::time::sleep(PORT_POLL_INTERVAL).await;
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| ApplicationError::PortUnreachable { port, timeout })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::scaffold::{Features, default_config};
    use crate::infrastructure::shell::MockCommandExecutor;
    use tempfile::TempDir;
    use tokio::net::TcpListener;

    fn config(transport: TransportKind, features: Features) -> Config {
        default_config("weather", transport, 9123, features)
            .validate()
            .unwrap()
    }

    #[test]
    fn test_methods_follow_collections() {
        let features = Features {
            tools: true,
            resources: false,
            prompts: true,
        };
        assert_eq!(
            methods(&config(TransportKind::Stdio, features)),
            vec!["tools/list", "prompts/list"]
        );
    }

    #[test]
    fn test_stdio_plan() {
        let plan = plan(&config(TransportKind::Stdio, Features::all()), "weather");

        assert!(plan.server_command.is_none());
        assert_eq!(plan.calls.len(), 3);
        assert_eq!(
            plan.calls[0].command.to_string(),
            "npx @modelcontextprotocol/inspector --cli --transport stdio --method tools/list -- cargo run --quiet --bin weather"
        );
    }

    #[test]
    fn test_http_plan() {
        let plan = plan(&config(TransportKind::Http, Features::all()), "weather");

        assert_eq!(
            plan.server_command.as_ref().map(ToString::to_string).as_deref(),
            Some("cargo run --quiet --bin weather")
        );
        assert_eq!(plan.port, Some(9123));
        assert_eq!(
            plan.calls[1].command.to_string(),
            "npx @modelcontextprotocol/inspector --cli http://localhost:9123/mcp --transport http --method resources/list"
        );
    }

    #[test]
    fn test_plan_builds_the_server_binary() {
        let plan = plan(&config(TransportKind::Http, Features::all()), "mcp_3d_printer");
        assert_eq!(plan.build.label, "cargo build --bin mcp_3d_printer");
    }

    #[tokio::test]
    async fn test_run_builds_before_inspector_calls() {
        let dir = TempDir::new().unwrap();
        let config = config(TransportKind::Stdio, Features::all());
        let plan = plan(&config, "weather");
        let mut executor = MockCommandExecutor::new().with_result(&plan.build.label, 0, "", "");
        for call in &plan.calls {
            executor = executor.with_result(&call.command.to_string(), 0, "{}", "");
        }

        run(&config, dir.path(), &executor).await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], "cargo build --bin weather");
        assert!(calls[1..].iter().all(|c| c.starts_with("npx ")));
    }

    #[tokio::test]
    async fn test_failed_build_skips_inspector_calls() {
        let dir = TempDir::new().unwrap();
        let config = config(TransportKind::Http, Features::all());
        let executor = MockCommandExecutor::new().with_result(
            "cargo build --bin weather",
            101,
            "",
            "error: could not compile\n",
        );

        let err = run(&config, dir.path(), &executor).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::CheckFailed { ref step, exit_code: 101, .. }
                if step == "cargo build --bin weather"
        ));
        assert_eq!(executor.calls(), vec!["cargo build --bin weather"]);
    }

    #[tokio::test]
    async fn test_run_reports_failing_method() {
        let dir = TempDir::new().unwrap();
        let config = config(TransportKind::Stdio, Features::all());
        let plan = plan(&config, "weather");
        let calls = plan.calls;
        let executor = MockCommandExecutor::new()
            .with_result(&plan.build.label, 0, "", "")
            .with_result(&calls[0].command.to_string(), 0, "", "")
            .with_result(&calls[1].command.to_string(), 1, "", "connection closed\n");

        let err = run(&config, dir.path(), &executor).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::InspectorFailed { ref method, exit_code: 1, ref stderr }
                if method == "resources/list" && stderr == "connection closed"
        ));
        assert_eq!(executor.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_run_without_collections_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let features = Features {
            tools: false,
            resources: false,
            prompts: false,
        };
        let executor = MockCommandExecutor::new();

        run(&config(TransportKind::Http, features), dir.path(), &executor)
            .await
            .unwrap();
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_wait_for_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = i64::from(listener.local_addr().unwrap().port());
        wait_for_port(port, Duration::from_secs(1)).await.unwrap();

        drop(listener);
        let err = wait_for_port(port, Duration::from_millis(50)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::PortUnreachable { .. }));
    }
}
