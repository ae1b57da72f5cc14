//! Shuru Hoja — read-only filesystem analyser.
//!
//! Thin binary entry point. All logic lives in the `shuruhoja-core`
//! and `shuruhoja-cli` crates.

use clap::Parser;
use shuruhoja_cli::Cli;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match shuruhoja_cli::run(&cli) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Structured logging to stderr. `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "shuruhoja=debug,shuruhoja_core=debug,shuruhoja_cli=debug,warn"
    } else {
        "shuruhoja=info,shuruhoja_core=info,shuruhoja_cli=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}
