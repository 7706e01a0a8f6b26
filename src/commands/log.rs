//! # Log Command Implementation
//!
//! Prints the most recent commits of every repository below a directory.

use anyhow::Result;
use clap::Args;

use repoweave::defaults::DEFAULT_LOG_COMMITS;
use repoweave::git;
use repoweave::output::OutputConfig;

use super::{run_per_repository, WorkerArgs};

/// Show recent commits of every repository
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Directory or repository name to inspect (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Number of commits to show per repository
    #[arg(short = 'n', long, value_name = "N", default_value_t = DEFAULT_LOG_COMMITS)]
    pub num_commits: usize,

    /// One line per commit
    #[arg(short = 'l', long)]
    pub oneline: bool,

    #[command(flatten)]
    pub workers: WorkerArgs,
}

/// Execute the `log` command.
pub fn execute(args: LogArgs, out: &OutputConfig) -> Result<()> {
    let count = args.num_commits;
    let oneline = args.oneline;
    let color = out.use_color;

    run_per_repository(args.path.as_deref(), &args.workers, "log", |repo| {
        git::log(repo, count, oneline, color).map(Some)
    })
}
