//! # Switch Command Implementation
//!
//! Runs `git switch` in one repository, given by path or by directory name.

use anyhow::Result;
use clap::Args;

use repoweave::git::{self, SwitchMode};
use repoweave::output;
use repoweave::suggestions;

use super::resolve_named;

/// Switch one repository to another version
#[derive(Args, Debug)]
pub struct SwitchArgs {
    /// Repository path, or the name of its directory
    #[arg(value_name = "REPO")]
    pub repo: String,

    /// Branch, tag or commit to switch to
    #[arg(short, long, value_name = "VERSION")]
    pub branch: String,

    /// Create the branch and switch to it
    #[arg(short, long, conflicts_with = "detach")]
    pub create: bool,

    /// Detach HEAD at the given commit or tag
    #[arg(short, long)]
    pub detach: bool,
}

impl SwitchArgs {
    fn mode(&self) -> SwitchMode {
        if self.create {
            SwitchMode::Create
        } else if self.detach {
            SwitchMode::Detach
        } else {
            SwitchMode::Existing
        }
    }
}

/// Execute the `switch` command.
pub fn execute(args: SwitchArgs) -> Result<()> {
    let repo = resolve_named(&args.repo)?;
    if !git::is_git_repository(&repo) {
        return Err(suggestions::not_a_git_repository(&repo));
    }

    let message = git::switch(&repo, &args.branch, args.mode())?;
    println!("{}", output::repo_entry(repo.display(), &message));
    Ok(())
}
