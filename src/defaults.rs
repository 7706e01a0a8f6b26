//! Default values for repoweave commands.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

/// Number of concurrent workers used by every command that fans out over
/// repositories.
pub const DEFAULT_WORKERS: usize = 8;

/// Number of clone attempts per repository during an import.
pub const DEFAULT_RETRIES: u32 = 2;

/// Sentinel accepted by `--depth-recursive` meaning "no depth limit".
pub const UNLIMITED_DEPTH: i64 = -1;

/// Number of commits shown per repository by `log`.
pub const DEFAULT_LOG_COMMITS: usize = 4;

/// File extensions recognized as manifests, without the leading dot.
pub const MANIFEST_EXTENSIONS: [&str; 2] = ["repos", "rosinstall"];

/// The only version-control system repoweave can import.
pub const SUPPORTED_VCS: &str = "git";

/// Environment variable that overrides the default worker count.
pub const WORKERS_ENV: &str = "REPOWEAVE_WORKERS";
