//! Integration tests for the mcpgen binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mcpgen() -> Command {
    Command::cargo_bin("mcpgen").unwrap()
}

#[test]
fn test_dry_run_prints_summary_only() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("weather");

    mcpgen()
        .args(["--name", "weather", "--dry-run", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Server:    weather (v0.1.0)"))
        .stdout(predicate::str::contains("Features:  greet, readme, welcome"))
        .stdout(predicate::str::contains("Dry run enabled"));

    assert!(!out.exists());
}

#[test]
fn test_invalid_transport_is_rejected() {
    mcpgen()
        .args(["--transport", "tcp", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tcp"));
}

#[test]
fn test_empty_name_is_rejected() {
    mcpgen()
        .args(["--name", "  ", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--name cannot be empty"));
}

#[test]
fn test_invalid_port_reports_validation_error() {
    mcpgen()
        .args(["--transport", "http", "--port", "70000", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("port"));
}

#[test]
fn test_generates_without_checks() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("weather");

    mcpgen()
        .args([
            "--name",
            "weather",
            "--transport",
            "http",
            "--with-prompts=false",
            "--skip-checks",
            "--no-inspector",
            "--output-dir",
        ])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Open in Inspector"))
        .stdout(predicate::str::contains("http://localhost:8080/mcp"));

    assert!(out.join("cmd/weather/main.rs").exists());
    assert!(out.join("internal/mcpapp/tools/handlers/tests.rs").exists());
    assert!(!out.join("internal/mcpapp/prompts/tests.rs").exists());
}

#[test]
fn test_config_file_drives_generation() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("server.yaml");
    std::fs::write(
        &config,
        "server:\n  name: forecast\ntool:\n  - id: get-forecast\n  - id: alerts\n",
    )
    .unwrap();
    let out = dir.path().join("out");

    mcpgen()
        .arg("--config")
        .arg(&config)
        .args(["--skip-checks", "--no-inspector", "--output-dir"])
        .arg(&out)
        .assert()
        .success();

    let handlers =
        std::fs::read_to_string(out.join("internal/mcpapp/tools/handlers/mod.rs")).unwrap();
    assert!(handlers.contains("GetForecastTool"));
    assert!(handlers.contains("AlertsTool"));
    assert!(!out.join("internal/mcpapp/resources/tests.rs").exists());
}
