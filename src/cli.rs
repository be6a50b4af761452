//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// TRG Checks - Audit GitHub repositories against the Tractus-X Release Guidelines
#[derive(Parser, Debug)]
#[command(name = "trg-checks")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check every product of the organization against the release guidelines
    Check(commands::check::CheckArgs),

    /// List the products of the organization without cloning anything
    Products(commands::products::ProductsArgs),

    /// Run the release guidelines against a local checkout
    Inspect(commands::inspect::InspectArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Check(args) => commands::check::execute(args, &self.color),
            Commands::Products(args) => commands::products::execute(args, &self.color),
            Commands::Inspect(args) => commands::inspect::execute(args, &self.color),
        }
    }
}

/// Logs go to stderr; stdout carries only command output.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}
