//! Locating repositories in a workspace and running work across them.
//!
//! Every verb other than `import` follows the same shape: find the git
//! repositories below a directory, then run one git operation per
//! repository on a fixed-size worker pool.

use std::path::{Path, PathBuf};

use log::warn;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::git::is_git_repository;

/// Finds git repositories at or below `root`, sorted by path.
///
/// `.git` directories are not entered, but the walk does continue inside a
/// repository so nested repositories are found too.
pub fn find_git_repositories(root: &Path) -> Vec<PathBuf> {
    let mut repos = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => {
                if is_git_repository(entry.path()) {
                    repos.push(entry.into_path());
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable path while looking for repositories: {}", e),
        }
    }
    repos
}

/// Resolves the repository argument of a command.
///
/// An existing path is used as is and must be a directory. Anything else is
/// treated as a directory name and searched for below `search_root`.
pub fn resolve_repo_path(name: &str, search_root: &Path) -> Result<PathBuf> {
    let given = Path::new(name);
    if let Ok(meta) = given.metadata() {
        if !meta.is_dir() {
            return Err(Error::NotADirectory {
                path: given.to_path_buf(),
            });
        }
        return Ok(given.to_path_buf());
    }

    let not_found = || Error::RepositoryNotFound {
        name: name.to_string(),
        root: search_root.to_path_buf(),
    };
    // Only bare names are searched for
    if name.is_empty() || given.components().count() != 1 {
        return Err(not_found());
    }

    WalkDir::new(search_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git")
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_dir() && entry.file_name() == given.as_os_str())
        .map(|entry| entry.into_path())
        .ok_or_else(not_found)
}

/// Runs `operation` for every item on a pool of `workers` threads.
///
/// Results come back in the order of `items`, whatever order the workers
/// finished in.
pub fn fan_out<I, T, F>(items: &[I], workers: usize, operation: F) -> Result<Vec<T>>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> T + Sync,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| Error::WorkerPool {
            message: e.to_string(),
        })?;

    Ok(pool.install(|| items.par_iter().map(&operation).collect()))
}
