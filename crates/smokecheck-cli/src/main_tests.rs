// crates/smokecheck-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Tests
// Description: Unit tests for argument parsing and report rendering.
// Purpose: Pin the CLI surface and the format selection logic.
// Dependencies: smokecheck-cli main helpers
// ============================================================================

//! ## Overview
//! Validates subcommand parsing and the text/JSON report rendering paths.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use clap::Parser;
use serde_json::Value;
use smokecheck_core::CheckOutcome;
use smokecheck_core::CheckResult;
use smokecheck_core::RunReport;

use super::Cli;
use super::Commands;
use super::ConfigCommands;
use super::ConfigValidateCommand;
use super::ReportFormat;
use super::RunCommand;
use super::command_config_validate;
use super::command_run;
use super::render_report;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Configuration exercising only the offline SDK suite.
const OFFLINE_CONFIG: &str = r#"
[target]
base_url = "http://127.0.0.1:8000"

[sdk]
api_key = "test-key"
api_version = "2024-02-01"
endpoint = "https://example.openai.azure.com"
"#;

fn sample_report() -> RunReport {
    RunReport {
        results: vec![CheckResult {
            name: "root-endpoint".to_string(),
            outcome: CheckOutcome::Passed,
            message: "service responded with status 200".to_string(),
            detail: None,
        }],
        overall_passed: true,
        aborted: None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn version_flag_parses() {
    let cli = Cli::try_parse_from(["smokecheck", "--version"]).expect("parse");
    assert!(cli.show_version);
    assert!(cli.command.is_none());
}

#[test]
fn run_defaults_to_text_format() {
    let cli = Cli::try_parse_from(["smokecheck", "run"]).expect("parse");
    match cli.command {
        Some(Commands::Run(command)) => {
            assert_eq!(command.format, ReportFormat::Text);
            assert!(command.config.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn run_accepts_json_format_and_config_path() {
    let cli = Cli::try_parse_from([
        "smokecheck",
        "run",
        "--config",
        "custom.toml",
        "--format",
        "json",
    ])
    .expect("parse");
    match cli.command {
        Some(Commands::Run(command)) => {
            assert_eq!(command.format, ReportFormat::Json);
            assert_eq!(command.config, Some(PathBuf::from("custom.toml")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn run_rejects_unknown_format() {
    let parsed = Cli::try_parse_from(["smokecheck", "run", "--format", "yaml"]);
    assert!(parsed.is_err());
}

#[test]
fn probe_parses_config_path() {
    let cli =
        Cli::try_parse_from(["smokecheck", "probe", "--config", "custom.toml"]).expect("parse");
    match cli.command {
        Some(Commands::Probe(command)) => {
            assert_eq!(command.config, Some(PathBuf::from("custom.toml")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn config_validate_parses() {
    let cli = Cli::try_parse_from(["smokecheck", "config", "validate"]).expect("parse");
    match cli.command {
        Some(Commands::Config {
            command: ConfigCommands::Validate(command),
        }) => {
            assert!(command.config.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn text_report_contains_result_and_summary() {
    let rendered = render_report(&sample_report(), ReportFormat::Text).expect("render");
    assert!(rendered.contains("PASS root-endpoint: service responded with status 200"));
    assert!(rendered.contains("smoke test passed"));
}

#[test]
fn config_validate_accepts_a_valid_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("smokecheck.toml");
    std::fs::write(&path, OFFLINE_CONFIG).expect("write config");
    let command = ConfigValidateCommand {
        config: Some(path),
    };
    assert!(command_config_validate(&command).is_ok());
}

#[test]
fn run_command_completes_with_offline_suite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("smokecheck.toml");
    std::fs::write(&path, OFFLINE_CONFIG).expect("write config");
    let command = RunCommand {
        config: Some(path),
        format: ReportFormat::Json,
    };
    assert!(command_run(&command).is_ok());
}

#[test]
fn json_report_is_parseable_and_structured() {
    let rendered = render_report(&sample_report(), ReportFormat::Json).expect("render");
    let value: Value = serde_json::from_str(&rendered).expect("valid json");
    assert_eq!(value.get("overall_passed").and_then(Value::as_bool), Some(true));
    let results = value.get("results").and_then(Value::as_array).expect("results array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].get("outcome").and_then(Value::as_str), Some("passed"));
}
