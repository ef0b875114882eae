use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Capstan - idempotent single-host deployment orchestrator
#[derive(Parser, Debug)]
#[command(name = "capstan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output NDJSON events for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converge the target host to the configured deployed state
    Deploy {
        /// SSH destination (user@host); overrides the config file
        #[arg(long)]
        host: Option<String>,

        /// Path to the configuration file
        #[arg(short, long, default_value = "capstan.toml")]
        config: PathBuf,

        /// Probe the host and report what would change, write nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Report the deployed state of the target host (read-only)
    Status {
        /// SSH destination (user@host); overrides the config file
        #[arg(long)]
        host: Option<String>,

        /// Path to the configuration file
        #[arg(short, long, default_value = "capstan.toml")]
        config: PathBuf,
    },
}
