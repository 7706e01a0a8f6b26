//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `repoweave` command-line tool, one file per subcommand.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic by calling into the `repoweave` library.
//!
//! Apart from `import`, the commands share one shape: resolve the optional
//! `[PATH]` argument, find the git repositories below it, and run a git
//! operation per repository on a pool of `-w/--workers` threads. The helpers
//! for that shape live here.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::builder::RangedU64ValueParser;
use clap::Args;

use repoweave::defaults::{DEFAULT_WORKERS, WORKERS_ENV};
use repoweave::error::Error;
use repoweave::output;
use repoweave::path::display_name;
use repoweave::suggestions;
use repoweave::workspace::{fan_out, find_git_repositories, resolve_repo_path};

pub mod completions;
pub mod export;
pub mod import;
pub mod log;
pub mod pull;
pub mod status;
pub mod switch;
pub mod sync;
pub mod validate;

/// Worker pool size shared by every fan-out command.
#[derive(Args, Debug, Clone)]
pub struct WorkerArgs {
    /// Number of concurrent workers
    #[arg(
        short,
        long,
        value_name = "N",
        default_value_t = DEFAULT_WORKERS,
        env = WORKERS_ENV,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub workers: usize,
}

impl Default for WorkerArgs {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Resolves the optional `[PATH]` argument to a directory.
///
/// No argument means the current directory. A name that is not an existing
/// path is looked up as a directory name below the current directory.
pub(crate) fn resolve_root(path: Option<&str>) -> Result<PathBuf> {
    match path {
        None => Ok(PathBuf::from(".")),
        Some(name) => resolve_named(name),
    }
}

/// Resolves one repository argument, suggesting close matches on failure.
pub(crate) fn resolve_named(name: &str) -> Result<PathBuf> {
    let search_root = Path::new(".");
    resolve_repo_path(name, search_root).map_err(|e| match e {
        Error::RepositoryNotFound { name, .. } => {
            let known: Vec<String> = find_git_repositories(search_root)
                .iter()
                .map(|repo| display_name(repo))
                .collect();
            suggestions::repository_not_found(&name, &known)
        }
        other => anyhow::Error::new(other),
    })
}

/// Runs `operation` on every repository below `path` and prints each
/// repository's block as soon as it is ready.
///
/// `operation` returns the block body, or `None` to print nothing for that
/// repository. Failures are printed in place and counted; the command fails
/// when any repository failed.
pub(crate) fn run_per_repository<F>(
    path: Option<&str>,
    workers: &WorkerArgs,
    verb: &str,
    operation: F,
) -> Result<()>
where
    F: Fn(&Path) -> repoweave::error::Result<Option<String>> + Sync,
{
    let root = resolve_root(path)?;
    let repos = find_git_repositories(&root);
    if repos.is_empty() {
        println!(
            "{}",
            output::warning(format!("No git repositories found in {}", root.display()))
        );
        return Ok(());
    }

    let outcomes = fan_out(&repos, workers.workers, |repo| {
        let (body, ok) = match operation(repo.as_path()) {
            Ok(Some(body)) => (body, true),
            Ok(None) => return true,
            Err(e) => (output::error(e), false),
        };
        println!("{}", output::repo_entry(repo.display(), &body));
        ok
    })?;

    let failed = outcomes.iter().filter(|ok| !**ok).count();
    if failed > 0 {
        anyhow::bail!("{} failed in {} of {} repositories", verb, failed, repos.len());
    }
    Ok(())
}
