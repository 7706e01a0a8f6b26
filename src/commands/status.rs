//! # Status Command Implementation
//!
//! This module implements the `status` subcommand, which prints `git status`
//! for every repository below a directory. With `-s/--skip-empty`, clean
//! repositories are left out so only the ones with changes show up.

use anyhow::Result;
use clap::Args;

use repoweave::git;
use repoweave::output::OutputConfig;

use super::{run_per_repository, WorkerArgs};

/// Show the git status of every repository
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Directory or repository name to inspect (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Short branch-and-files format (git status -sb)
    #[arg(short, long)]
    pub plain: bool,

    /// Hide repositories without changes
    #[arg(short, long)]
    pub skip_empty: bool,

    #[command(flatten)]
    pub workers: WorkerArgs,
}

/// Returns true when `status` describes a repository without changes.
///
/// Short format prints only the branch line for a clean tree.
fn is_clean(status: &str, plain: bool) -> bool {
    if plain {
        status.trim_end().lines().count() <= 1
    } else {
        status.contains("working tree clean")
    }
}

/// Execute the `status` command.
pub fn execute(args: StatusArgs, out: &OutputConfig) -> Result<()> {
    let plain = args.plain;
    let skip_empty = args.skip_empty;
    let color = out.use_color;

    run_per_repository(args.path.as_deref(), &args.workers, "status", |repo| {
        let status = git::status(repo, plain, color)?;
        if skip_empty && is_clean(&console::strip_ansi_codes(&status), plain) {
            return Ok(None);
        }
        Ok(Some(status))
    })
}
