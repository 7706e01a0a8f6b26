//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks a manifest
//! without cloning anything.
//!
//! ## Functionality
//!
//! - **Manifest Validation**: The file must exist, carry a manifest extension
//!   and parse in one of the two supported layouts.
//! - **Reachability**: Every git entry is checked with `git ls-remote`, which
//!   also confirms that a branch or tag version exists on the remote. Commit
//!   versions are not advertised by remotes, so for them only the URL is
//!   checked.
//!
//! This command is a safe, read-only operation that does not modify any files.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use log::warn;

use repoweave::git;
use repoweave::manifest::{self, RepositoryDescriptor};
use repoweave::output;
use repoweave::suggestions;
use repoweave::workspace::fan_out;

use super::WorkerArgs;

/// Check that every repository of a manifest is reachable
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Manifest file to validate (.repos or .rosinstall)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub workers: WorkerArgs,
}

/// Checks one manifest entry, returning a problem description on failure.
fn check_entry(descriptor: &RepositoryDescriptor) -> std::result::Result<String, String> {
    if !descriptor.kind.is_supported() {
        return Err(format!("unsupported repository type '{}'", descriptor.kind));
    }

    git::check_remote(&descriptor.url, &descriptor.version).map_err(|e| e.to_string())?;

    if git::is_valid_sha(&descriptor.version) {
        warn!(
            "Commit {} of {} cannot be verified without cloning",
            descriptor.version, descriptor.url
        );
        Ok(format!(
            "Reachable: {} (commit {} not verified)",
            descriptor.url, descriptor.version
        ))
    } else if descriptor.version.is_empty() {
        Ok(format!("Reachable: {}", descriptor.url))
    } else {
        Ok(format!("Reachable: {} ({})", descriptor.url, descriptor.version))
    }
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs) -> Result<()> {
    let manifest = manifest::from_file(&args.file).map_err(suggestions::manifest_error)?;
    let entries: Vec<(String, RepositoryDescriptor)> = manifest.into_iter().collect();

    let results = fan_out(&entries, args.workers.workers, |(name, descriptor)| {
        let verdict = check_entry(descriptor);
        let body = match &verdict {
            Ok(message) => output::success(message),
            Err(problem) => output::error(format!("Invalid: {}", problem)),
        };
        println!("{}", output::repo_entry(name, &body));
        verdict.is_ok()
    })?;

    let invalid = results.iter().filter(|ok| !**ok).count();
    if invalid > 0 {
        anyhow::bail!(
            "{} of {} repositories in {} are not valid",
            invalid,
            results.len(),
            args.file.display()
        );
    }
    println!(
        "{}",
        output::section(format!("{} is valid", args.file.display()))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use repoweave::manifest::VcsKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unsupported_kind_is_invalid() {
        let descriptor = RepositoryDescriptor {
            kind: VcsKind::from("hg"),
            ..RepositoryDescriptor::git("https://example.com/repo")
        };
        let problem = check_entry(&descriptor).unwrap_err();
        assert!(problem.contains("unsupported repository type 'hg'"));
    }

    #[test]
    fn test_execute_missing_file() {
        let args = ValidateArgs {
            file: PathBuf::from("/nonexistent/deps.repos"),
            workers: WorkerArgs::default(),
        };
        let message = execute(args).unwrap_err().to_string();
        assert!(message.contains("Manifest file does not exist"));
    }

    #[test]
    fn test_execute_wrong_extension() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("deps.txt");
        fs::write(&file, "repositories: {}\n").unwrap();

        let args = ValidateArgs {
            file,
            workers: WorkerArgs::default(),
        };
        let message = execute(args).unwrap_err().to_string();
        assert!(message.contains(".repos or .rosinstall"));
    }

    #[test]
    fn test_execute_unsupported_entry_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("deps.repos");
        fs::write(
            &file,
            "repositories:\n  old:\n    type: svn\n    url: https://invalid.example/svn\n",
        )
        .unwrap();

        let args = ValidateArgs {
            file,
            workers: WorkerArgs::default(),
        };
        let message = execute(args).unwrap_err().to_string();
        assert!(message.contains("1 of 1 repositories"));
    }
}
