//! # Pull Command Implementation
//!
//! Runs `git pull` in every repository below a directory.

use anyhow::Result;
use clap::Args;

use repoweave::git;

use super::{run_per_repository, WorkerArgs};

/// Pull every repository
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Directory or repository name to pull (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    #[command(flatten)]
    pub workers: WorkerArgs,
}

/// Execute the `pull` command.
pub fn execute(args: PullArgs) -> Result<()> {
    run_per_repository(args.path.as_deref(), &args.workers, "pull", |repo| {
        git::pull(repo).map(Some)
    })
}
