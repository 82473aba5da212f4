//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Builds CliArgs and discovers Config
//! - Installs the tracing subscriber
//! - Creates the tokio runtime
//! - Dispatches to command handlers
//! - Handles all error output

use clap::Parser;

use super::args::{Cli, Commands};
use super::commands;

use crate::{CliArgs, Config, ExitCode, WorkflowError};
use rolecraft_utils::error::{display_for_user, ConfigError, LlmError};
use rolecraft_utils::logging::init_tracing;
use rolecraft_utils::redaction::redact_error_message;

/// Main CLI execution function.
///
/// This function handles ALL output including errors. On failure it prints
/// the report and returns the exit code; main.rs only calls
/// `std::process::exit(code.as_i32())`.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let bind = match &cli.command {
        Commands::Serve { bind } => bind.clone(),
        _ => None,
    };
    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        bind,
        fixtures_dir: cli.fixtures_dir.clone(),
        llm_provider: cli.llm_provider.clone(),
        model: cli.model.clone(),
        temperature: cli.temperature,
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => return Err(report(&err)),
    };

    if let Err(e) = init_tracing(cli.verbose, config.log_json(), config.log_level()) {
        eprintln!("✗ Failed to initialise logging: {e}");
        return Err(ExitCode::INTERNAL);
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let result = rt.block_on(async {
        match cli.command {
            Commands::Serve { .. } => commands::execute_serve_command(&config).await,
            Commands::Generate {
                role,
                issue,
                document,
                json,
            } => commands::execute_generate_command(&role, &issue, &document, json, &config).await,
            Commands::Config => commands::execute_config_command(&config),
        }
    });

    result.map_err(|err| report(&err))
}

/// Print a failure on stderr and pick its exit code.
pub(super) fn report(error: &anyhow::Error) -> ExitCode {
    if let Some(err) = error.downcast_ref::<WorkflowError>() {
        eprintln!("{}", redact_error_message(&display_for_user(err)));
        return ExitCode::from(err);
    }
    if let Some(err) = error.downcast_ref::<LlmError>() {
        eprintln!("{}", redact_error_message(&display_for_user(err)));
        return ExitCode::GENERATION_FAILURE;
    }
    if let Some(err) = error.downcast_ref::<ConfigError>() {
        eprintln!("{}", display_for_user(err));
        return ExitCode::from(err);
    }

    eprintln!("✗ Unexpected error: {}", redact_error_message(&format!("{error:#}")));
    eprintln!("\n  General troubleshooting:");
    eprintln!("    - Run with --verbose for more detailed output");
    eprintln!("    - Check the configuration with `rolecraft config`");
    ExitCode::INTERNAL
}
