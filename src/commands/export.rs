//! # Export Command Implementation
//!
//! This module implements the `export` subcommand, which writes the git
//! repositories found below a directory back out as a `.repos` manifest.
//!
//! ## Functionality
//!
//! - **Discovery**: Every git repository at or below `[PATH]` is exported,
//!   keyed by its path relative to `[PATH]`.
//! - **Versions**: The current branch (or tag) is recorded by default;
//!   `-c/--commits` records the checked out commit instead.
//! - **Destination**: `-o/--output` writes the manifest to a file and
//!   `-v/--visualize` prints it. At least one of them is required.
//!
//! Repositories whose remote or version cannot be read are left out with a
//! warning.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::warn;

use repoweave::manifest::Manifest;
use repoweave::output;
use repoweave::path::manifest_key;
use repoweave::repository;
use repoweave::suggestions;
use repoweave::workspace::{fan_out, find_git_repositories};

use super::{resolve_root, WorkerArgs};

/// Export the repositories of a workspace as a manifest
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Directory or repository name to export (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Path of the `.repos` file to write
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Record commit hashes instead of branches
    #[arg(short, long)]
    pub commits: bool,

    /// Print the exported manifest
    #[arg(short, long)]
    pub visualize: bool,

    #[command(flatten)]
    pub workers: WorkerArgs,
}

/// Execute the `export` command.
pub fn execute(args: ExportArgs) -> Result<()> {
    if args.output.is_none() && !args.visualize {
        return Err(suggestions::export_needs_destination());
    }

    let root = resolve_root(args.path.as_deref())?;
    let repos = find_git_repositories(&root);
    let use_commit = args.commits;

    let described = fan_out(&repos, args.workers.workers, |repo| {
        repository::describe(repo, use_commit)
    })?;

    let mut manifest = Manifest::new();
    for (repo, result) in repos.iter().zip(described) {
        match result {
            Ok(descriptor) => manifest.insert(manifest_key(&root, repo), descriptor),
            Err(e) => {
                warn!("Not exporting {}: {}", repo.display(), e);
                eprintln!(
                    "{}",
                    output::warning(format!("Skipped {}: {}", repo.display(), e))
                );
            }
        }
    }

    let yaml = manifest.to_yaml()?;
    if args.visualize {
        println!("{}", yaml);
    }
    if let Some(file) = &args.output {
        fs::write(file, &yaml)
            .with_context(|| format!("Failed to export repositories to {}", file.display()))?;
        println!(
            "{}",
            output::success(format!(
                "Exported {} repositories to {}",
                manifest.len(),
                file.display()
            ))
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ExportArgs,
    }

    #[test]
    fn test_flags() {
        let args = TestCli::try_parse_from(["export", "ws", "-o", "out.repos", "-c", "-v"])
            .unwrap()
            .args;
        assert_eq!(args.path.as_deref(), Some("ws"));
        assert_eq!(args.output, Some(PathBuf::from("out.repos")));
        assert!(args.commits);
        assert!(args.visualize);
    }

    #[test]
    fn test_requires_destination() {
        let args = ExportArgs {
            path: None,
            output: None,
            commits: false,
            visualize: false,
            workers: WorkerArgs::default(),
        };
        let message = execute(args).unwrap_err().to_string();
        assert!(message.contains("-o/--output"));
    }

    #[test]
    fn test_empty_workspace_writes_empty_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("out.repos");
        let args = ExportArgs {
            path: Some(temp_dir.path().to_str().unwrap().to_string()),
            output: Some(file.clone()),
            commits: false,
            visualize: false,
            workers: WorkerArgs::default(),
        };

        execute(args).unwrap();
        let written = fs::read_to_string(&file).unwrap();
        assert!(written.contains("repositories"));
    }
}
