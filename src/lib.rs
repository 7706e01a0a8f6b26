//! # repoweave Library
//!
//! This library provides the core of the `repoweave` command-line tool:
//! realizing a workspace of many git repositories from a declarative manifest,
//! including manifests nested inside the repositories it clones.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use repoweave::exclude::should_exclude;
//! use repoweave::manifest;
//!
//! let manifest = manifest::parse(
//!     r#"
//! repositories:
//!   demos:
//!     type: git
//!     url: https://github.com/ros2/demos.git
//!     version: rolling
//!     exclude: [demos/extra.repos]
//! "#,
//! )
//! .unwrap();
//! assert_eq!(manifest.len(), 1);
//!
//! let (_, demos) = manifest.iter().next().unwrap();
//! assert!(should_exclude(Path::new("demos/extra.repos"), &demos.exclude));
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifests (`manifest`)**: `.repos` and `.rosinstall` documents, parsed
//!   into one uniform map of directory name to repository descriptor.
//! - **Exclusion (`exclude`)**: Rules that prune nested manifests from a
//!   recursive import.
//! - **Import engine (`import`)**: Concurrent clone sweeps plus the recursive
//!   discovery controller that chains them.
//! - **Git access (`git`, `repository`)**: Wrappers around the `git`
//!   executable, and the `GitOperations` seam the engine clones through.
//! - **Workspaces (`workspace`)**: Finding repositories on disk and fanning an
//!   operation out over them.
//!
//! ## Execution Flow
//!
//! A recursive import runs:
//!
//! 1.  **Initial sweep**: Clone every repository of the given manifest.
//! 2.  **Discovery**: Look for manifests inside what was just cloned.
//! 3.  **Filtering**: Drop manifests matched by an exclusion pattern.
//! 4.  **Nested sweeps**: Clone the repositories of each remaining manifest,
//!     then go back to step 2 until nothing new turns up or the depth limit
//!     is hit.

pub mod defaults;
pub mod error;
pub mod exclude;
pub mod git;
pub mod import;
pub mod manifest;
pub mod output;
pub mod path;
pub mod repository;
pub mod suggestions;
pub mod workspace;

#[cfg(test)]
mod exclude_proptest;
