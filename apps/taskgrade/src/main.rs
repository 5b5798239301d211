//! # Taskgrade Binary
//!
//! Entry point: parse arguments, install logging, run the command.
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable.

use clap::Parser;
use std::process::ExitCode;
use taskgrade::cli::{run, Cli};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "taskgrade=debug,taskgrade_core=debug"
    } else {
        "taskgrade=info,taskgrade_core=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
