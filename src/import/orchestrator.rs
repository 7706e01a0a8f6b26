//! Recursive discovery controller.
//!
//! Drives one top-level import: the initial sweep, then generations of
//! discovery, exclusion filtering and sweeps of newly found manifests.
//!
//! ```text
//!   SWEEPING ──invalid──▶ FAILED
//!      │
//!      ├─ not recursive ──▶ DONE
//!      ▼
//!   DISCOVERING ◀──────────────┐
//!      │ depth reached          │ something new swept
//!      │ nothing found          │
//!      │ same count as before   │
//!      │ nothing new swept ──▶ DONE
//!      │ a sweep invalid ──▶ FAILED
//!      └────────────────────────┘
//! ```
//!
//! Every nested manifest is swept into the same root as the initial one, so
//! manifest keys stay relative to the workspace.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use super::discovery::find_manifest_files;
use super::sweep::SweepExecutor;
use super::{ImportOptions, ImportReporter, SweepResult};
use crate::exclude::{ExclusionMatcher, PrefixMatch};
use crate::path::normalize;
use crate::repository::GitOperations;

/// Terminal state of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStatus {
    Done,
    Failed,
}

impl ImportStatus {
    /// Process exit code for this status.
    pub fn exit_code(&self) -> i32 {
        match self {
            ImportStatus::Done => 0,
            ImportStatus::Failed => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        *self == ImportStatus::Done
    }
}

/// Summary of a finished import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub status: ImportStatus,
    /// Discovery passes that ran after the initial sweep.
    pub generations: u32,
    /// Manifests that were swept, including the initial one.
    pub swept_manifests: Vec<PathBuf>,
    /// Discovered manifests skipped by an exclusion pattern.
    pub excluded_manifests: Vec<PathBuf>,
}

/// How a manifest was handled once discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestVisit {
    Swept,
    Excluded,
}

/// Mutable state of one recursive import.
#[derive(Debug)]
pub struct DiscoveryState {
    pub visited: BTreeMap<PathBuf, ManifestVisit>,
    pub active_excludes: ExclusionMatcher,
    /// Generations that swept at least one new manifest.
    pub sweep_count: u32,
    /// Number of manifests found by the previous generation.
    pub previous_found: Option<usize>,
    /// Every path cloned so far; discovery only looks below these.
    pub search_roots: Vec<PathBuf>,
    pub generations: u32,
}

impl DiscoveryState {
    pub fn new(initial_manifest: &Path, excludes: &[String], prefix_match: PrefixMatch) -> Self {
        let mut visited = BTreeMap::new();
        visited.insert(normalize(initial_manifest), ManifestVisit::Swept);
        Self {
            visited,
            active_excludes: ExclusionMatcher::new(excludes.iter().cloned(), prefix_match),
            sweep_count: 0,
            previous_found: None,
            search_roots: Vec::new(),
            generations: 0,
        }
    }

    /// Folds a successful sweep into the state.
    pub fn absorb(&mut self, result: SweepResult) {
        let new_patterns: Vec<String> = result
            .collected_excludes
            .into_iter()
            .filter(|p| !self.active_excludes.patterns().contains(p))
            .collect();
        self.active_excludes.extend(new_patterns);
        for path in result.cloned_paths {
            if !self.search_roots.contains(&path) {
                self.search_roots.push(path);
            }
        }
    }

    fn finish(self, status: ImportStatus) -> ImportReport {
        let with_visit = |wanted: ManifestVisit| {
            self.visited
                .iter()
                .filter(|(_, visit)| **visit == wanted)
                .map(|(path, _)| path.clone())
                .collect::<Vec<_>>()
        };
        ImportReport {
            status,
            generations: self.generations,
            swept_manifests: with_visit(ManifestVisit::Swept),
            excluded_manifests: with_visit(ManifestVisit::Excluded),
        }
    }
}

/// Runs top-level imports.
pub struct RecursiveImport<'a> {
    git: &'a dyn GitOperations,
    reporter: &'a dyn ImportReporter,
    options: &'a ImportOptions,
}

impl<'a> RecursiveImport<'a> {
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

    /// Imports `manifest` into `root`, following nested manifests when
    /// `recursive` is set.
    ///
    /// `excludes` seeds the exclusion list; patterns declared by swept
    /// repositories are added as the import progresses.
    pub fn run(
        &self,
        root: &Path,
        manifest: &Path,
        excludes: &[String],
        recursive: bool,
    ) -> ImportReport {
        let sweeper = SweepExecutor::new(self.git, self.reporter, self.options);
        let mut state = DiscoveryState::new(manifest, excludes, self.options.prefix_match);

        let initial = sweeper.run(root, manifest);
        if !initial.all_succeeded {
            error!("Import of {} failed", manifest.display());
            return state.finish(ImportStatus::Failed);
        }
        state.absorb(initial);

        if !recursive {
            return state.finish(ImportStatus::Done);
        }
        let status = self.discover(root, &sweeper, &mut state);
        state.finish(status)
    }

    fn discover(
        &self,
        root: &Path,
        sweeper: &SweepExecutor<'_>,
        state: &mut DiscoveryState,
    ) -> ImportStatus {
        loop {
            if self.options.depth.is_reached(state.sweep_count) {
                info!("Depth limit reached after {} recursive sweeps", state.sweep_count);
                return ImportStatus::Done;
            }

            let found = find_manifest_files(&state.search_roots);
            state.generations += 1;
            if found.is_empty() {
                info!("No nested manifests found");
                return ImportStatus::Done;
            }
            if state.previous_found == Some(found.len()) {
                info!("No new nested manifests since the previous generation");
                return ImportStatus::Done;
            }
            state.previous_found = Some(found.len());
            info!(
                "Generation {}: {} nested manifest(s) found",
                state.generations,
                found.len()
            );

            let mut swept_new = false;
            for candidate in found {
                if state.visited.contains_key(&candidate) {
                    continue;
                }
                if let Some(pattern) = state.active_excludes.matching_pattern(&candidate) {
                    warn!(
                        "Excluded cloning from '{}' (matches '{}')",
                        candidate.display(),
                        pattern
                    );
                    self.reporter.manifest_excluded(&candidate, pattern);
                    state.visited.insert(candidate, ManifestVisit::Excluded);
                    continue;
                }

                let result = sweeper.run(root, &candidate);
                state.visited.insert(candidate.clone(), ManifestVisit::Swept);
                swept_new = true;
                if !result.all_succeeded {
                    error!("Import of nested manifest {} failed", candidate.display());
                    return ImportStatus::Failed;
                }
                state.absorb(result);
            }

            if !swept_new {
                info!("Every nested manifest was already handled");
                return ImportStatus::Done;
            }
            state.sweep_count += 1;
        }
    }
}
