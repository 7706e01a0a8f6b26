//! # Recursive Import Engine
//!
//! This module realizes a manifest on disk, following manifests nested inside
//! the repositories it clones.
//!
//! ## Overview
//!
//! An import is made of sweeps and generations:
//!
//! 1. **Sweep** ([`sweep`]) - parse one manifest and clone every repository it
//!    declares on a fresh worker pool, with retries and skip/overwrite policy.
//! 2. **Discovery** ([`discovery`]) - walk the directories cloned so far for
//!    further `.repos` and `.rosinstall` files.
//! 3. **Generation** ([`orchestrator`]) - filter discovered manifests through
//!    the [`crate::exclude`] rules and sweep the unseen ones, until a depth
//!    limit or a fixed point is reached.
//!
//! Progress is reported through the [`ImportReporter`] trait, so the command
//! layer decides how (and whether) to print per-repository results.

use std::path::{Path, PathBuf};

use crate::defaults::{DEFAULT_RETRIES, DEFAULT_WORKERS};
use crate::error::Error;
use crate::exclude::PrefixMatch;
use crate::git::CloneOptions;
use crate::manifest::{Manifest, RepositoryDescriptor};
use crate::path::workspace_join;

pub mod discovery;
pub mod orchestrator;
pub mod sweep;

#[cfg(test)]
pub(crate) mod mock;

pub use discovery::find_manifest_files;
pub use orchestrator::{ImportReport, ImportStatus, RecursiveImport};
pub use sweep::SweepExecutor;

/// How many generations of nested manifests to follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepthLimit {
    #[default]
    Unlimited,
    Limited(u32),
}

impl DepthLimit {
    /// Converts the command-line form, where any negative value (`-1` by
    /// convention) means unlimited.
    pub fn from_sentinel(depth: i64) -> Self {
        if depth < 0 {
            Self::Unlimited
        } else {
            Self::Limited(u32::try_from(depth).unwrap_or(u32::MAX))
        }
    }

    /// Returns true once `sweeps` recursive sweeps exhaust the limit.
    pub fn is_reached(&self, sweeps: u32) -> bool {
        match self {
            Self::Unlimited => false,
            Self::Limited(limit) => sweeps >= *limit,
        }
    }
}

/// Settings shared by every sweep of one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Worker threads per sweep.
    pub workers: usize,
    /// Clone attempts per repository.
    pub retries: u32,
    /// Remove and re-clone destinations that already exist.
    pub overwrite: bool,
    pub shallow: bool,
    pub recurse_submodules: bool,
    pub depth: DepthLimit,
    pub prefix_match: PrefixMatch,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            retries: DEFAULT_RETRIES,
            overwrite: false,
            shallow: false,
            recurse_submodules: false,
            depth: DepthLimit::Unlimited,
            prefix_match: PrefixMatch::Literal,
        }
    }
}

impl ImportOptions {
    pub(crate) fn clone_options(&self) -> CloneOptions {
        CloneOptions {
            shallow: self.shallow,
            recurse_submodules: self.recurse_submodules,
        }
    }
}

/// One repository to realize at a target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportJob {
    /// The manifest key.
    pub name: String,
    pub target_path: PathBuf,
    pub descriptor: RepositoryDescriptor,
}

impl ImportJob {
    /// Splits a manifest into jobs rooted at `root`.
    pub fn from_manifest(root: &Path, manifest: Manifest) -> Vec<ImportJob> {
        manifest
            .into_iter()
            .map(|(name, descriptor)| ImportJob {
                target_path: workspace_join(root, &name),
                name,
                descriptor,
            })
            .collect()
    }
}

/// Why a job ended unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFailure {
    /// The descriptor names a VCS other than git.
    UnsupportedKind(String),
    /// Every clone attempt failed; `message` is the last error.
    CloneFailed { attempts: u32, message: String },
    /// An existing or partial destination could not be removed.
    RemoveFailed(String),
}

impl std::fmt::Display for JobFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobFailure::UnsupportedKind(kind) => {
                write!(f, "unsupported repository type '{}'", kind)
            }
            JobFailure::CloneFailed { attempts, message } => {
                write!(f, "clone failed after {} attempt(s): {}", attempts, message)
            }
            JobFailure::RemoveFailed(message) => write!(f, "{}", message),
        }
    }
}

/// Final outcome of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Cloned { attempts: u32 },
    /// The destination already existed and overwrite was off.
    Skipped,
    Failed(JobFailure),
}

impl JobOutcome {
    /// Cloned and skipped jobs both count as success.
    pub fn is_success(&self) -> bool {
        !matches!(self, JobOutcome::Failed(_))
    }
}

/// A finished job, as handed to the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub name: String,
    pub target_path: PathBuf,
    pub url: String,
    pub version: String,
    pub outcome: JobOutcome,
}

/// Aggregate result of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepResult {
    /// True only if every job was cloned or skipped.
    pub all_succeeded: bool,
    /// Destinations that ended in a successful outcome.
    pub cloned_paths: Vec<PathBuf>,
    /// Exclusion patterns declared by the swept descriptors.
    pub collected_excludes: Vec<String>,
}

impl SweepResult {
    /// The result of a sweep whose manifest could not be used.
    pub fn invalid() -> Self {
        Self::default()
    }
}

/// Receives import progress.
///
/// Callbacks may arrive from worker threads. Every method has an empty
/// default so implementations pick only what they display.
pub trait ImportReporter: Send + Sync {
    /// A sweep is about to start `jobs` jobs for `manifest`.
    fn sweep_started(&self, _manifest: &Path, _jobs: usize) {}

    /// A job finished, successfully or not.
    fn job_finished(&self, _report: &JobReport) {}

    /// A sweep could not run (unusable manifest or worker pool failure).
    fn sweep_aborted(&self, _manifest: &Path, _error: &Error) {}

    /// A discovered manifest matched `pattern` and will not be swept.
    fn manifest_excluded(&self, _manifest: &Path, _pattern: &str) {}
}

/// A reporter that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ImportReporter for NoopReporter {}
