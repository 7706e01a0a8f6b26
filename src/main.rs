//! # repoweave CLI
//!
//! This is the binary entry point for the `repoweave` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Handling top-level application errors, which `main` turns into a
//!   non-zero exit status.
//!
//! The import engine and the git wrappers live in the `repoweave` library
//! crate; the binary is a thin layer of commands over it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
