//! # Sync Command Implementation
//!
//! Brings every repository below a directory up to date without losing local
//! work: changes are stashed, the repository is pulled, and the stash is
//! popped again. A stash that existed before the command ran is left alone.

use anyhow::Result;
use clap::Args;

use repoweave::git;

use super::{run_per_repository, WorkerArgs};

/// Stash, pull and restore every repository
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Directory or repository name to sync (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    #[command(flatten)]
    pub workers: WorkerArgs,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs) -> Result<()> {
    run_per_repository(args.path.as_deref(), &args.workers, "sync", |repo| {
        git::sync(repo).map(Some)
    })
}
