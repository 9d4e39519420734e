//! Portfolio command-line entry point.
//!
//! # Responsibility
//! - Render the static page and preview scroll-driven nav state offline.
//! - Map failures to a non-zero exit code with a one-line message.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use commands::CliError;
use portfolio_core::{default_log_level, init_logging, init_stderr_logging};
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = start_logging(&cli) {
        eprintln!("portfolio: {err}");
        return ExitCode::FAILURE;
    }

    match commands::run(&cli.command) {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(err) = stdout.write_all(output.as_bytes()) {
                eprintln!("portfolio: {}", CliError::Output(err));
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("event=command_failed module=cli status=error error={err}");
            eprintln!("portfolio: {err}");
            ExitCode::FAILURE
        }
    }
}

fn start_logging(cli: &Cli) -> Result<(), CliError> {
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let started = match (&cli.log_dir, &cli.log_level) {
        (Some(dir), _) => init_logging(level, &dir.to_string_lossy()),
        (None, Some(_)) => init_stderr_logging(level),
        (None, None) => Ok(()),
    };
    started.map_err(CliError::Logging)
}
