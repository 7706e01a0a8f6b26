//! Test doubles for the import engine.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{ImportReporter, JobReport};
use crate::error::{Error, Result};
use crate::git::CloneOptions;
use crate::repository::GitOperations;

/// Mock git operations that "clone" by creating a directory with a `.git`
/// folder and any files registered for the URL.
///
/// Like `git clone`, it refuses a target that already exists.
#[derive(Default)]
pub(crate) struct MockGitOperations {
    clone_calls: Arc<Mutex<Vec<(String, String, PathBuf)>>>,
    failures_left: Mutex<HashMap<String, u32>>,
    files: HashMap<String, Vec<(String, String)>>,
    leave_partial: bool,
    removal_blocked: bool,
    removals: Mutex<Vec<PathBuf>>,
}

impl MockGitOperations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the first `times` clones of `url`.
    pub fn failing_times(self, url: &str, times: u32) -> Self {
        self.failures_left
            .lock()
            .unwrap()
            .insert(url.to_string(), times);
        self
    }

    pub fn always_failing(self, url: &str) -> Self {
        self.failing_times(url, u32::MAX)
    }

    /// Writes `content` at `relative` inside every clone of `url`.
    pub fn with_file(mut self, url: &str, relative: &str, content: &str) -> Self {
        self.files
            .entry(url.to_string())
            .or_default()
            .push((relative.to_string(), content.to_string()));
        self
    }

    /// Failed clones leave a half-written target directory behind.
    pub fn leaving_partial_clones(mut self) -> Self {
        self.leave_partial = true;
        self
    }

    /// Every removal of a checkout fails, as if the files were locked.
    pub fn blocking_removal(mut self) -> Self {
        self.removal_blocked = true;
        self
    }

    pub fn removals(&self) -> Vec<PathBuf> {
        self.removals.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<(String, String, PathBuf)> {
        self.clone_calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls().iter().filter(|call| call.0 == url).count()
    }

    pub fn cloned_targets(&self) -> Vec<PathBuf> {
        let mut targets: Vec<PathBuf> = self.calls().into_iter().map(|call| call.2).collect();
        targets.sort();
        targets
    }
}

impl GitOperations for MockGitOperations {
    fn clone_repository(
        &self,
        url: &str,
        version: &str,
        target: &Path,
        _options: &CloneOptions,
    ) -> Result<()> {
        self.clone_calls
            .lock()
            .unwrap()
            .push((url.to_string(), version.to_string(), target.to_path_buf()));

        let clone_error = |message: &str| Error::GitClone {
            url: url.to_string(),
            version: version.to_string(),
            message: message.to_string(),
        };

        if target.exists() {
            return Err(clone_error("destination path already exists"));
        }

        let should_fail = {
            let mut failures = self.failures_left.lock().unwrap();
            match failures.get_mut(url) {
                Some(left) if *left > 0 => {
                    *left -= 1;
                    true
                }
                _ => false,
            }
        };
        if should_fail {
            if self.leave_partial {
                fs::create_dir_all(target.join(".git"))?;
            }
            return Err(clone_error("simulated network failure"));
        }

        fs::create_dir_all(target.join(".git"))?;
        for (relative, content) in self.files.get(url).into_iter().flatten() {
            let path = target.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
        }
        Ok(())
    }

    fn remove_checkout(&self, target: &Path) -> Result<()> {
        self.removals.lock().unwrap().push(target.to_path_buf());
        if self.removal_blocked {
            return Err(Error::RemovePath {
                path: target.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked"),
            });
        }
        crate::repository::remove_path(target)
    }
}

/// Reporter that records every callback.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    started: Mutex<Vec<(PathBuf, usize)>>,
    jobs: Mutex<Vec<JobReport>>,
    aborted: Mutex<Vec<PathBuf>>,
    excluded: Mutex<Vec<(PathBuf, String)>>,
}

impl RecordingReporter {
    pub fn started(&self) -> Vec<(PathBuf, usize)> {
        self.started.lock().unwrap().clone()
    }

    pub fn jobs(&self) -> Vec<JobReport> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn aborted(&self) -> Vec<PathBuf> {
        self.aborted.lock().unwrap().clone()
    }

    pub fn excluded(&self) -> Vec<(PathBuf, String)> {
        self.excluded.lock().unwrap().clone()
    }
}

impl ImportReporter for RecordingReporter {
    fn sweep_started(&self, manifest: &Path, jobs: usize) {
        self.started
            .lock()
            .unwrap()
            .push((manifest.to_path_buf(), jobs));
    }

    fn job_finished(&self, report: &JobReport) {
        self.jobs.lock().unwrap().push(report.clone());
    }

    fn sweep_aborted(&self, manifest: &Path, _error: &Error) {
        self.aborted.lock().unwrap().push(manifest.to_path_buf());
    }

    fn manifest_excluded(&self, manifest: &Path, pattern: &str) {
        self.excluded
            .lock()
            .unwrap()
            .push((manifest.to_path_buf(), pattern.to_string()));
    }
}
