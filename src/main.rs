//! # crossbuild CLI
//!
//! Binary entry point: parses arguments with `clap`, sets up logging, and
//! dispatches to the subcommand. All real work lives in the library.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
