//! Performance test definition generator

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

mod cli;
mod commands;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match commands::execute(cli.command) {
        Ok(Some(output)) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_failure(err: &anyhow::Error) {
    error!("{:#}", err);
}

/// Logs go to stderr so stdout carries only the rendered document
fn setup_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Filter directive covering the library and this binary's own modules
fn log_filter(verbose: bool) -> String {
    let log_level = if verbose { "debug" } else { "info" };
    format!(
        "perftest_core={0},{1}={0}",
        log_level,
        env!("CARGO_CRATE_NAME")
    )
}
