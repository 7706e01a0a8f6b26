//! Manifest discovery inside cloned repositories.

use std::collections::BTreeSet;
use std::path::PathBuf;

use log::warn;
use walkdir::WalkDir;

use crate::manifest::is_manifest_file;

/// Finds every manifest file below `search_roots`.
///
/// `.git` directories are not entered. Roots that do not exist are ignored.
/// An unreadable directory is reported and its subtree skipped, while the
/// rest of the walk continues. The result is sorted and free of duplicates,
/// so overlapping roots are harmless.
pub fn find_manifest_files(search_roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();

    for root in search_roots {
        if !root.exists() {
            continue;
        }
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git");

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && is_manifest_file(entry.path()) {
                        found.insert(entry.into_path());
                    }
                }
                Err(e) => {
                    let location = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    warn!("Skipping {} during manifest discovery: {}", location, e);
                }
            }
        }
    }

    found.into_iter().collect()
}
