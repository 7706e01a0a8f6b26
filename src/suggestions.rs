//! # Error Suggestions
//!
//! Helpers that build errors telling the user what went wrong AND how to fix
//! it. Library errors from [`crate::error`] describe the failure; these add
//! the hints that only make sense at the command line.
//!
//! ```rust,ignore
//! // Instead of:
//! anyhow::bail!("Manifest file does not exist: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::manifest_not_found(path));
//! ```

use std::path::Path;

use crate::defaults::MANIFEST_EXTENSIONS;
use crate::error::Error;

/// Error for a manifest path that does not exist.
pub fn manifest_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Manifest file does not exist: {path}\n\n\
         hint: Pass the manifest with -i/--input <FILE>\n\
         hint: Relative paths are resolved from the current directory",
        path = path.display()
    )
}

/// Error for a manifest path without a manifest extension.
pub fn invalid_manifest_extension(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Not a manifest file: {path}\n\n\
         hint: Manifests must end in {extensions}",
        path = path.display(),
        extensions = MANIFEST_EXTENSIONS
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(" or ")
    )
}

/// Turns a manifest loading error into a hinted one where a hint exists.
pub fn manifest_error(error: Error) -> anyhow::Error {
    match error {
        Error::ManifestNotFound { path } => manifest_not_found(&path),
        Error::InvalidManifestExtension { path } => invalid_manifest_extension(&path),
        Error::EmptyManifest => anyhow::anyhow!(
            "{}\n\n\
             hint: Add at least one entry under 'repositories:'",
            Error::EmptyManifest
        ),
        other => anyhow::Error::new(other),
    }
}

/// Error for `export` called with nowhere to send the result.
pub fn export_needs_destination() -> anyhow::Error {
    anyhow::anyhow!(
        "Nothing to do: the exported manifest is neither written nor shown\n\n\
         hint: Use -o/--output <FILE> to write it to a file\n\
         hint: Use -v/--visualize to print it"
    )
}

/// Error for a repository name that matches no directory.
///
/// `known` is the set of repository directory names in the workspace, used to
/// suggest a close match.
pub fn repository_not_found(name: &str, known: &[String]) -> anyhow::Error {
    let candidates: Vec<&str> = known.iter().map(String::as_str).collect();
    let did_you_mean = find_similar(name, &candidates)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Failed to find a repository named '{name}'{did_you_mean}\n\n\
         hint: Pass a path to the repository, or the name of its directory\n\
         hint: Run 'repoweave status' to list the repositories in this workspace"
    )
}

/// Error for a path that exists but is not a git repository.
pub fn not_a_git_repository(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "{path} is not a git repository\n\n\
         hint: Import it first with 'repoweave import'",
        path = path.display()
    )
}

/// Returns the closest candidate within an edit distance of 2.
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, edit_distance(input, candidate)))
        .filter(|&(_, distance)| distance <= 2 && distance < input.len())
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance, computed one row at a time.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, a_char) in a.chars().enumerate() {
        let mut current = Vec::with_capacity(previous.len());
        current.push(i + 1);
        for (j, b_char) in b_chars.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != *b_char);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current.push(substitution.min(deletion).min(insertion));
        }
        previous = current;
    }

    previous[b_chars.len()]
}
