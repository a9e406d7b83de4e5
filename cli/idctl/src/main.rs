//! idctl - CLI for portal identifiers
//!
//! Parses, validates, formats and derives ids against the built-in portal
//! contexts or contexts declared in a grammar file.

use anyhow::Result;
use clap::Parser;

mod commands;
mod config;
mod error;
mod logging;
mod output;

use commands::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = cli.run() {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
