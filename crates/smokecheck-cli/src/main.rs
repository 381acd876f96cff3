// crates/smokecheck-cli/src/main.rs
// ============================================================================
// Module: Smokecheck CLI Entry Point
// Description: Command dispatcher for smoke-test runs and config tooling.
// Purpose: Map harness runs onto process exit codes for automation.
// Dependencies: clap, smokecheck-checks, smokecheck-config, smokecheck-core
// ============================================================================

//! ## Overview
//! The smokecheck CLI loads a validated configuration, executes the harness,
//! and renders the run report as text or JSON. The sole automation contract
//! is the exit code: zero when every executed check and every alternative
//! path group succeeded, one otherwise. The `probe` command exposes the
//! readiness gate on its own, and `config validate` checks a configuration
//! without touching any collaborator.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use smokecheck_checks::HttpProbeTransport;
use smokecheck_checks::execute;
use smokecheck_config::SmokecheckConfig;
use smokecheck_core::ReadinessProbe;
use smokecheck_core::RunReport;
use smokecheck_core::ThreadSleeper;
use smokecheck_core::render_text;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "smokecheck", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute the configured smoke-test run.
    Run(RunCommand),
    /// Probe the target for readiness without running any check.
    Probe(ProbeCommand),
    /// Configuration utilities.
    Config {
        /// Selected configuration subcommand.
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Arguments for the run command.
#[derive(Args, Debug)]
struct RunCommand {
    /// Path to the configuration file (defaults to `SMOKECHECK_CONFIG` or
    /// `smokecheck.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output format for the run report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
}

/// Arguments for the probe command.
#[derive(Args, Debug)]
struct ProbeCommand {
    /// Path to the configuration file (defaults to `SMOKECHECK_CONFIG` or
    /// `smokecheck.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Load and validate a configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for configuration validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Path to the configuration file (defaults to `SMOKECHECK_CONFIG` or
    /// `smokecheck.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Output formats for the run report.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum ReportFormat {
    /// Line-per-check text report.
    Text,
    /// JSON report for automation.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("smokecheck {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Run(command) => command_run(&command),
        Commands::Probe(command) => command_probe(&command),
        Commands::Config {
            command,
        } => match command {
            ConfigCommands::Validate(command) => command_config_validate(&command),
        },
    }
}

/// Prints top-level help when no subcommand is given.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Loads configuration, executes the harness, and reports the verdict.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let config = SmokecheckConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    let report = execute(&config).map_err(|err| CliError::new(err.to_string()))?;
    let rendered = render_report(&report, command.format)?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if report.overall_passed {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Renders a run report in the requested format.
fn render_report(report: &RunReport, format: ReportFormat) -> CliResult<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|err| CliError::new(format!("report serialization failed: {err}"))),
    }
}

// ============================================================================
// SECTION: Probe Command
// ============================================================================

/// Probes the target for readiness without executing any check.
fn command_probe(command: &ProbeCommand) -> CliResult<ExitCode> {
    let config = SmokecheckConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    let transport = HttpProbeTransport::new().map_err(|err| CliError::new(err.to_string()))?;
    let policy = config.target.probe.policy();
    let probe = ReadinessProbe::new(transport, ThreadSleeper, policy);
    if probe.wait_ready(&config.target.base_url) {
        write_stdout_line(&format!("target {} is ready", config.target.base_url))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(ExitCode::SUCCESS)
    } else {
        write_stdout_line(&format!(
            "target {} is not ready after {} attempts",
            config.target.base_url, policy.max_attempts
        ))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(ExitCode::FAILURE)
    }
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Loads and validates a configuration file.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    SmokecheckConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    write_stdout_line("configuration valid")
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output write failure message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Writes an error message to stderr and returns a failing exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
