//! # Error Handling
//!
//! This module defines the centralized error type for the `repoweave`
//! library. It uses `thiserror` to build a single `Error` enum whose variants
//! cover every failure the library can report, each carrying enough context
//! (paths, URLs, the git command that ran) to produce a useful message.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into the same groups the import
//!   engine reasons about:
//!   - manifest errors (`ManifestNotFound`, `InvalidManifestExtension`,
//!     `EmptyManifest`, `ManifestParse`), which abort the sweep that hit them;
//!   - per-repository VCS errors (`GitClone`, `GitCommand`, `RemovePath`),
//!     which are recorded per job and folded into a sweep verdict;
//!   - workspace errors (`RepositoryNotFound`, `NotADirectory`, `WorkerPool`);
//!   - wrapped foreign errors (`Io`, `Yaml`, `Walk`).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for repoweave operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest file given to a command does not exist.
    #[error("Manifest file does not exist: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    /// The manifest file does not end in `.repos` or `.rosinstall`.
    #[error("Manifest file {} does not have a valid .repos or .rosinstall extension", path.display())]
    InvalidManifestExtension { path: PathBuf },

    /// The manifest parsed but declares no repositories.
    #[error("Empty manifest: no repositories declared")]
    EmptyManifest,

    /// The manifest could not be decoded as either supported schema.
    ///
    /// Carries an optional hint about how to fix the document.
    #[error("Manifest parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ManifestParse {
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// `git clone` failed for a repository.
    #[error("Git clone error for {url}{}: {message}", version_suffix(version))]
    GitClone {
        url: String,
        version: String,
        message: String,
    },

    /// Any other `git` invocation failed.
    #[error("Git command failed in {}: git {command} - {stderr}", path.display())]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// An existing destination could not be removed before cloning over it.
    #[error("Failed to remove existing path {}: {source}", path.display())]
    RemovePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A repository given by name could not be located under the search root.
    #[error("Failed to find a directory named '{name}' under {}", root.display())]
    RepositoryNotFound { name: String, root: PathBuf },

    /// A path that must be a directory points at something else.
    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// The worker pool for a sweep or fan-out could not be created.
    #[error("Failed to start worker pool: {message}")]
    WorkerPool { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

fn version_suffix(version: &str) -> String {
    if version.is_empty() {
        String::new()
    } else {
        format!("@{}", version)
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
