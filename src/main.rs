//! Capstan CLI - idempotent single-host deployment orchestrator
//!
//! Usage: capstan <COMMAND>
//!
//! Commands:
//!   deploy  Converge the target host to the configured deployed state
//!   status  Report the deployed state of the target host

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::Deploy {
            host,
            config,
            dry_run,
        } => commands::deploy::run(host, &config, dry_run, cli.json, cli.verbose),
        cli::Commands::Status { host, config } => {
            commands::status::run(host, &config, cli.json)
        }
    }
}
