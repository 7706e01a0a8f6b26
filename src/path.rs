//! Path manipulation utilities for repoweave

use std::path::{Component, Path, PathBuf};

/// Lexically drop `.` components from a path.
///
/// `./ws/./a` becomes `ws/a`. Parent components are kept, nothing touches the
/// filesystem, and a path that reduces to nothing becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Joins a manifest key onto the directory a sweep clones into.
///
/// Importing into `.` yields `demos` rather than `./demos`, so exclusion
/// prefixes written relative to the workspace keep matching. Only the plain
/// components of `name` are joined, so the result never leaves `root`.
pub fn workspace_join(root: &Path, name: &str) -> PathBuf {
    let mut joined = root.to_path_buf();
    joined.extend(
        Path::new(name)
            .components()
            .filter(|c| matches!(c, Component::Normal(_))),
    );
    normalize(&joined)
}

/// A short human name for a repository directory.
///
/// Uses the last path component, resolving `.` and similar paths against the
/// filesystem when they have none.
pub fn display_name(path: &Path) -> String {
    if let Some(name) = normalize(path).file_name() {
        return name.to_string_lossy().into_owned();
    }
    path.canonicalize()
        .ok()
        .and_then(|abs| abs.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| path.display().to_string())
}

/// The manifest key a repository found under `root` should be exported as.
///
/// This is the path relative to `root`, so the exported manifest recreates
/// the same layout when imported into the same place. A repository that is
/// `root` itself falls back to [`display_name`].
pub fn manifest_key(root: &Path, repo: &Path) -> String {
    let root = normalize(root);
    let repo = normalize(repo);
    match repo.strip_prefix(&root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/"),
        _ => display_name(&repo),
    }
}
