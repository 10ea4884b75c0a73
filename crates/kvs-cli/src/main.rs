//! kvs CLI
//!
//! Resolves layered key-value configuration from the command line.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("Failed to initialize logging: {e}")))?;
    tracing::debug!("Verbose mode enabled");

    match &cli.command {
        Commands::Resolve(args) => commands::run_resolve(args),
        Commands::Check(args) => commands::run_check(args),
        Commands::Media => commands::run_media(),
    }
}
