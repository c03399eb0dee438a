//! endpoint-proxy: forward webhook events to local endpoints
//!
//! Entry point for the endpoint-proxy application.

use endpoint_proxy::config::{Cli, Command, ForwardArgs, ValidatedConfig, write_default_config};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let args = match &cli.command {
        Command::Init { output } => return handle_init(output),
        Command::Forward(args) => args,
    };

    match load_config(&cli, args) {
        Ok(config) => {
            setup_tracing(cli.verbose);
            tracing::debug!("{config}");
            run_application(config)
        }
        Err(code) => code,
    }
}

/// Loads and validates configuration, printing errors for the user.
fn load_config(cli: &Cli, args: &ForwardArgs) -> Result<ValidatedConfig, ExitCode> {
    ValidatedConfig::load(cli, args).map_err(|e| {
        eprintln!("Configuration error: {e}");
        print_config_hint(&e);
        exit_code::CONFIG_ERROR
    })
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Runs the forward command with the given configuration.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(config: ValidatedConfig) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(config)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            exit_code::runtime_error()
        }
    }
}
