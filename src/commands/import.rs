//! # Import Command Implementation
//!
//! This module implements the `import` subcommand, which clones every
//! repository of a manifest into a directory. With `-r/--recursive`, manifests
//! found inside the cloned repositories are imported as well, generation after
//! generation, until nothing new turns up or the `-d/--depth-recursive` limit
//! is reached.
//!
//! ## Exclusions
//!
//! Nested manifests can be skipped with `-x/--exclude` patterns or with the
//! `exclude:` list of a repository entry. A pattern matches a manifest by file
//! name, by parent directory name, or as a path prefix (see
//! `--exclude-prefix` for how prefixes are compared).
//!
//! ## Exit status
//!
//! The command fails (exit code 1) when any sweep reports a failed repository
//! or an unusable manifest. Repositories cloned before the failure stay on
//! disk.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};

use repoweave::defaults::{DEFAULT_RETRIES, UNLIMITED_DEPTH};
use repoweave::error::Error;
use repoweave::exclude::PrefixMatch;
use repoweave::import::{
    DepthLimit, ImportOptions, ImportReporter, JobOutcome, JobReport, RecursiveImport,
};
use repoweave::manifest;
use repoweave::output;
use repoweave::repository::DefaultGitOperations;
use repoweave::suggestions;

use super::WorkerArgs;

/// How exclusion patterns are compared as path prefixes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExcludePrefix {
    /// Plain string prefix: 'foo' also excludes 'foobar/x.repos'
    #[default]
    Literal,
    /// Whole path components: 'foo' excludes 'foo/x.repos' only
    Segment,
}

impl From<ExcludePrefix> for PrefixMatch {
    fn from(prefix: ExcludePrefix) -> Self {
        match prefix {
            ExcludePrefix::Literal => PrefixMatch::Literal,
            ExcludePrefix::Segment => PrefixMatch::Segment,
        }
    }
}

/// Clone the repositories of a manifest
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Directory to clone into (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Manifest file (.repos or .rosinstall)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Also import manifests found inside the cloned repositories
    #[arg(short, long)]
    pub recursive: bool,

    /// Clone attempts per repository
    #[arg(
        short = 'n',
        long = "retry",
        value_name = "N",
        default_value_t = DEFAULT_RETRIES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub retry: u32,

    /// Remove and re-clone repositories that already exist
    #[arg(short, long)]
    pub force: bool,

    /// Clone only the latest commit (--depth 1)
    #[arg(short = 'l', long)]
    pub shallow: bool,

    /// Generations of nested manifests to follow (-1 for no limit)
    #[arg(
        short = 'd',
        long = "depth-recursive",
        value_name = "DEPTH",
        default_value_t = UNLIMITED_DEPTH,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(-1..)
    )]
    pub depth_recursive: i64,

    #[command(flatten)]
    pub workers: WorkerArgs,

    /// Nested manifests or directories to skip (comma separated or repeated)
    #[arg(short = 'x', long, value_name = "PATTERN", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Clone submodules too
    #[arg(short = 's', long)]
    pub recurse_submodules: bool,

    /// How exclusion patterns match path prefixes
    #[arg(long, value_enum, value_name = "MODE", default_value_t = ExcludePrefix::Literal)]
    pub exclude_prefix: ExcludePrefix,
}

impl ImportArgs {
    fn options(&self) -> ImportOptions {
        ImportOptions {
            workers: self.workers.workers,
            retries: self.retry,
            overwrite: self.force,
            shallow: self.shallow,
            recurse_submodules: self.recurse_submodules,
            depth: DepthLimit::from_sentinel(self.depth_recursive),
            prefix_match: self.exclude_prefix.into(),
        }
    }
}

/// Prints import progress, one block per repository.
struct ConsoleReporter;

impl ImportReporter for ConsoleReporter {
    fn sweep_started(&self, manifest: &Path, jobs: usize) {
        println!(
            "{}",
            output::section(format!(
                "Importing {} repositories from {}",
                jobs,
                manifest.display()
            ))
        );
    }

    fn job_finished(&self, report: &JobReport) {
        println!(
            "{}",
            output::repo_entry(report.target_path.display(), &describe_outcome(report))
        );
    }

    fn sweep_aborted(&self, manifest: &Path, error: &Error) {
        eprintln!(
            "{}",
            output::error(format!("Cannot import {}: {}", manifest.display(), error))
        );
    }

    fn manifest_excluded(&self, manifest: &Path, _pattern: &str) {
        println!(
            "{}\n{}",
            output::separator(),
            output::warning(format!("Excluded cloning from '{}'", manifest.display()))
        );
    }
}

fn describe_outcome(report: &JobReport) -> String {
    let source = if report.version.is_empty() {
        report.url.clone()
    } else {
        format!("{} ({})", report.url, report.version)
    };
    match &report.outcome {
        JobOutcome::Cloned { attempts: 1 } => output::success(format!("Cloned {}", source)),
        JobOutcome::Cloned { attempts } => output::success(format!(
            "Cloned {} after {} attempts",
            source, attempts
        )),
        JobOutcome::Skipped => output::warning(
            "Skipped: directory already exists (use -f/--force to overwrite)",
        ),
        JobOutcome::Failed(failure) => output::error(format!("Failed: {}", failure)),
    }
}

/// Execute the `import` command.
pub fn execute(args: ImportArgs) -> Result<()> {
    // Report manifest problems with hints before anything is cloned
    manifest::from_file(&args.input).map_err(suggestions::manifest_error)?;

    let root = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    if root.exists() && !root.is_dir() {
        return Err(Error::NotADirectory { path: root }.into());
    }

    let options = args.options();
    let report = RecursiveImport::new(&DefaultGitOperations, &ConsoleReporter, &options).run(
        &root,
        &args.input,
        &args.exclude,
        args.recursive,
    );

    if !report.status.is_success() {
        anyhow::bail!(
            "Encountered errors while importing {} (exit code {})",
            args.input.display(),
            report.status.exit_code()
        );
    }

    if args.recursive {
        println!(
            "{}",
            output::section(format!(
                "Imported {} manifest(s) over {} generation(s), {} excluded",
                report.swept_manifests.len(),
                report.generations,
                report.excluded_manifests.len()
            ))
        );
    }
    Ok(())
}
