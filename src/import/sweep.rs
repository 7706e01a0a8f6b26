//! Clone sweep: realize every repository of one manifest.
//!
//! Jobs run on a dedicated rayon pool sized to the configured worker count.
//! A new pool is built for each sweep and dropped when the sweep returns.
//! Results are folded into one `Mutex`-guarded accumulator, and the sweep
//! always waits for every job before reporting, even once a failure is known.

use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use super::{ImportJob, ImportOptions, ImportReporter, JobFailure, JobOutcome, JobReport, SweepResult};
use crate::error::Error;
use crate::manifest::{self, Manifest};
use crate::repository::GitOperations;

/// Runs clone sweeps with a fixed set of options.
pub struct SweepExecutor<'a> {
    git: &'a dyn GitOperations,
    reporter: &'a dyn ImportReporter,
    options: &'a ImportOptions,
}

#[derive(Default)]
struct Accumulator {
    failures: usize,
    result: SweepResult,
}

impl<'a> SweepExecutor<'a> {
    pub fn new(
        git: &'a dyn GitOperations,
        reporter: &'a dyn ImportReporter,
        options: &'a ImportOptions,
    ) -> Self {
        Self {
            git,
            reporter,
            options,
        }
    }

    /// Parses `manifest_path` and clones its repositories under `root`.
    ///
    /// A manifest that cannot be read or parsed aborts the sweep before any
    /// job starts and yields [`SweepResult::invalid`].
    pub fn run(&self, root: &Path, manifest_path: &Path) -> SweepResult {
        match manifest::from_file(manifest_path) {
            Ok(manifest) => self.run_manifest(root, manifest_path, manifest),
            Err(e) => self.abort(manifest_path, e),
        }
    }

    /// Clones the repositories of an already parsed manifest. `source` only
    /// names the manifest in logs and reports.
    pub fn run_manifest(&self, root: &Path, source: &Path, manifest: Manifest) -> SweepResult {
        let jobs = ImportJob::from_manifest(root, manifest);
        let workers = self.options.workers.max(1);

        let pool = match ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool,
            Err(e) => {
                return self.abort(
                    source,
                    Error::WorkerPool {
                        message: e.to_string(),
                    },
                )
            }
        };

        info!(
            "Sweeping {} ({} repositories, {} workers)",
            source.display(),
            jobs.len(),
            workers
        );
        self.reporter.sweep_started(source, jobs.len());

        let accumulator = Mutex::new(Accumulator::default());
        pool.install(|| {
            jobs.into_par_iter().for_each(|job| {
                let outcome = self.process(&job);
                {
                    let mut acc = accumulator.lock().unwrap_or_else(PoisonError::into_inner);
                    if outcome.is_success() {
                        acc.result.cloned_paths.push(job.target_path.clone());
                    } else {
                        acc.failures += 1;
                    }
                    for pattern in &job.descriptor.exclude {
                        if !acc.result.collected_excludes.contains(pattern) {
                            acc.result.collected_excludes.push(pattern.clone());
                        }
                    }
                }
                self.reporter.job_finished(&JobReport {
                    name: job.name,
                    target_path: job.target_path,
                    url: job.descriptor.url,
                    version: job.descriptor.version,
                    outcome,
                });
            });
        });

        let acc = accumulator
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut result = acc.result;
        result.all_succeeded = acc.failures == 0;
        if !result.all_succeeded {
            warn!(
                "{} of the repositories in {} failed to import",
                acc.failures,
                source.display()
            );
        }
        result
    }

    fn abort(&self, manifest_path: &Path, error: Error) -> SweepResult {
        warn!("Cannot import {}: {}", manifest_path.display(), error);
        self.reporter.sweep_aborted(manifest_path, &error);
        SweepResult::invalid()
    }

    fn process(&self, job: &ImportJob) -> JobOutcome {
        let descriptor = &job.descriptor;
        if !descriptor.kind.is_supported() {
            return JobOutcome::Failed(JobFailure::UnsupportedKind(descriptor.kind.to_string()));
        }

        let target = job.target_path.as_path();
        if target_present(target) {
            if !self.options.overwrite {
                debug!("{} already exists, skipping", target.display());
                return JobOutcome::Skipped;
            }
            if let Err(e) = self.git.remove_checkout(target) {
                return JobOutcome::Failed(JobFailure::RemoveFailed(e.to_string()));
            }
        }

        let attempts = self.options.retries.max(1);
        let clone_options = self.options.clone_options();
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            debug!(
                "Cloning {} into {} (attempt {}/{})",
                descriptor.url,
                target.display(),
                attempt,
                attempts
            );
            match self
                .git
                .clone_repository(&descriptor.url, &descriptor.version, target, &clone_options)
            {
                Ok(()) => return JobOutcome::Cloned { attempts: attempt },
                Err(e) => {
                    warn!(
                        "Attempt {}/{} to clone {} failed: {}",
                        attempt, attempts, descriptor.url, e
                    );
                    last_error = e.to_string();
                    // Leftovers of a failed clone would block the next attempt
                    if target_present(target) {
                        if let Err(e) = self.git.remove_checkout(target) {
                            return JobOutcome::Failed(JobFailure::RemoveFailed(e.to_string()));
                        }
                    }
                }
            }
        }

        JobOutcome::Failed(JobFailure::CloneFailed {
            attempts,
            message: last_error,
        })
    }
}

fn target_present(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
