//! # TRG Checks CLI
//!
//! This is the binary entry point for the `trg-checks` command-line tool.
//!
//! It parses the command line with `clap`, sets up logging, and dispatches
//! to the selected subcommand. All audit logic lives in the `trg_checks`
//! library crate; the binary only wires it to the terminal.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
