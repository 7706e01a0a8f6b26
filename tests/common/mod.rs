//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions, and manifest
//! snippets to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest("deps.repos", manifests::SINGLE_GIT);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    #[allow(unused_imports)]
    pub use super::{file_url, init_git_repo};
    pub use super::TestFixture;
}

/// Manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// One git repository on a host that never resolves.
    pub const SINGLE_GIT: &str = r#"repositories:
  demos:
    type: git
    url: https://invalid.example/demos.git
    version: main
"#;

    /// One repository of a VCS kind that is not supported.
    pub const UNSUPPORTED_KIND: &str = r#"repositories:
  legacy:
    type: hg
    url: https://invalid.example/legacy
"#;

    /// The same repository in the `.rosinstall` layout.
    pub const ROSINSTALL: &str = r#"- git:
    local-name: demos
    uri: https://invalid.example/demos.git
    version: main
"#;

    /// A `.repos` document without any repository.
    pub const EMPTY: &str = "repositories:\n";

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "repositories: [unclosed";
}

/// Runs git in `dir`, panicking with its stderr on failure.
fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Creates a git repository at `path` on branch `main` with one commit.
///
/// `files` are written and committed. The repository is usable as a clone
/// source through [`file_url`].
#[allow(dead_code)]
pub fn init_git_repo(path: &Path, files: &[(&str, &str)]) {
    std::fs::create_dir_all(path).expect("Failed to create repository directory");
    git(path, &["init", "--quiet", "--initial-branch=main"]);
    git(path, &["config", "user.email", "tests@repoweave.invalid"]);
    git(path, &["config", "user.name", "repoweave tests"]);
    git(path, &["config", "commit.gpgsign", "false"]);
    for (name, content) in files {
        let file = path.join(name);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(file, content).expect("Failed to write file");
    }
    git(path, &["add", "--all"]);
    git(path, &["commit", "--quiet", "--allow-empty", "-m", "initial"]);
}

/// `file://` URL of a local repository.
#[allow(dead_code)]
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// A test fixture that provides a temporary workspace directory.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_manifest("deps.repos", manifests::SINGLE_GIT)
///     .with_file("demos/README.md", "already here");
///
/// fixture
///     .command()
///     .args(["import", "-i", "deps.repos"])
///     .assert()
///     .success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a manifest file with the given name and content.
    pub fn with_manifest(self, name: &str, content: &str) -> Self {
        self.with_file(name, content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a file inside the fixture.
    #[allow(dead_code)]
    pub fn join(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("repoweave");
        cmd.current_dir(self.path()).env_remove("REPOWEAVE_WORKERS");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest("deps.repos", manifests::SINGLE_GIT);
        assert!(fixture.join("deps.repos").exists());
    }

    #[test]
    fn test_manifests_are_valid_yaml() {
        let manifests = [
            manifests::SINGLE_GIT,
            manifests::UNSUPPORTED_KIND,
            manifests::ROSINSTALL,
            manifests::EMPTY,
        ];

        for manifest in manifests {
            serde_yaml::from_str::<serde_yaml::Value>(manifest)
                .expect("Manifest should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        let result = serde_yaml::from_str::<serde_yaml::Value>(manifests::INVALID_YAML);
        assert!(result.is_err(), "INVALID_YAML should not parse");
    }
}
