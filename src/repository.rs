//! # Repository Operations
//!
//! This module sits between the `git` wrappers and the manifest model.
//!
//! The import engine never calls [`crate::git::clone`] directly. It goes
//! through the [`GitOperations`] trait so that sweeps can be driven by a mock
//! in tests, simulating slow, flaky or failing remotes without touching the
//! network. In the application, [`DefaultGitOperations`] forwards to the real
//! `git` executable.
//!
//! The module also turns an existing clone back into a
//! [`RepositoryDescriptor`], which is what `export` writes out.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::git::{self, CloneOptions};
use crate::manifest::RepositoryDescriptor;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones `url` into `target` and checks out `version` (default branch
    /// when empty). `target` does not exist when this is called.
    fn clone_repository(
        &self,
        url: &str,
        version: &str,
        target: &Path,
        options: &CloneOptions,
    ) -> Result<()>;

    /// Deletes whatever is at `target` so it can be cloned into again.
    fn remove_checkout(&self, target: &Path) -> Result<()> {
        remove_path(target)
    }
}

/// Removes a directory tree, a file or a symlink without following it.
pub fn remove_path(path: &Path) -> Result<()> {
    let removed = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) => Err(e),
    };
    removed.map_err(|source| Error::RemovePath {
        path: path.to_path_buf(),
        source,
    })
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real clones.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_repository(
        &self,
        url: &str,
        version: &str,
        target: &Path,
        options: &CloneOptions,
    ) -> Result<()> {
        git::clone(url, version, target, options)
    }
}

/// Describes the git clone at `path` as a manifest entry.
///
/// The version is the current branch (or a tag pointing at HEAD), or the
/// commit SHA when `use_commit` is set.
pub fn describe(path: &Path, use_commit: bool) -> Result<RepositoryDescriptor> {
    let url = git::remote_url(path)?;
    let version = if use_commit {
        git::commit_sha(path)?
    } else {
        git::current_branch(path)?
    };
    Ok(RepositoryDescriptor::git(url).with_version(version))
}
