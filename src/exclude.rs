//! # Exclusion Matching
//!
//! Recursive imports can be pruned with exclusion patterns, given on the
//! command line (`--exclude`) or declared per repository in a manifest
//! (`exclude:`). Before a discovered manifest is swept it is checked against
//! every active pattern; it is skipped when, for any pattern:
//!
//! 1. its file name equals the pattern's last component,
//! 2. the name of its parent directory equals the pattern's last component, or
//! 3. its path starts with the pattern.
//!
//! Rule 3 is a raw string prefix by default ([`PrefixMatch::Literal`]), so
//! `foo` also excludes `foobar/deps.repos`. [`PrefixMatch::Segment`] compares
//! whole path components instead.
//!
//! ```
//! use std::path::Path;
//! use repoweave::exclude::should_exclude;
//!
//! let excludes = vec!["nested.repos".to_string()];
//! assert!(should_exclude(Path::new("a/b/nested.repos"), &excludes));
//! assert!(!should_exclude(Path::new("a/b/nested.repos"), &["c.repos".to_string()]));
//! assert!(should_exclude(Path::new("a/b/nested.repos"), &["a/b".to_string()]));
//! ```

use std::ffi::OsStr;
use std::path::Path;

use crate::path::normalize;

/// How rule 3 (path prefix) compares a candidate with a pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrefixMatch {
    /// Plain string prefix: `foo` matches `foo/x.repos` and `foobar/x.repos`.
    #[default]
    Literal,
    /// Component-wise prefix: `foo` matches `foo/x.repos` only.
    Segment,
}

/// An accumulating set of exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct ExclusionMatcher {
    patterns: Vec<String>,
    prefix_match: PrefixMatch,
}

impl ExclusionMatcher {
    pub fn new<I, S>(patterns: I, prefix_match: PrefixMatch) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            prefix_match,
        }
    }

    /// Adds more patterns, keeping their order.
    pub fn extend<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns.extend(patterns.into_iter().map(Into::into));
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn prefix_match(&self) -> PrefixMatch {
        self.prefix_match
    }

    /// Returns the first pattern that excludes `candidate`, if any.
    pub fn matching_pattern(&self, candidate: &Path) -> Option<&str> {
        self.patterns
            .iter()
            .find(|pattern| pattern_excludes(candidate, pattern, self.prefix_match))
            .map(String::as_str)
    }

    pub fn matches(&self, candidate: &Path) -> bool {
        self.matching_pattern(candidate).is_some()
    }
}

/// Decides whether `candidate` is excluded by any of `excludes`, using the
/// literal prefix rule.
pub fn should_exclude(candidate: &Path, excludes: &[String]) -> bool {
    excludes
        .iter()
        .any(|pattern| pattern_excludes(candidate, pattern, PrefixMatch::Literal))
}

fn pattern_excludes(candidate: &Path, pattern: &str, prefix_match: PrefixMatch) -> bool {
    // An empty pattern would prefix-match every path
    if pattern.is_empty() {
        return false;
    }

    if let Some(pattern_name) = Path::new(pattern).file_name() {
        if candidate.file_name() == Some(pattern_name) {
            return true;
        }
        if parent_name(candidate) == Some(pattern_name) {
            return true;
        }
    }

    match prefix_match {
        PrefixMatch::Literal => candidate.to_string_lossy().starts_with(pattern),
        PrefixMatch::Segment => normalize(candidate).starts_with(normalize(Path::new(pattern))),
    }
}

fn parent_name(path: &Path) -> Option<&OsStr> {
    path.parent().and_then(Path::file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn excludes(patterns: &[&str]) -> Vec<String> {
        patterns.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_file_name_rule() {
        assert!(should_exclude(
            Path::new("a/b/nested.repos"),
            &excludes(&["nested.repos"])
        ));
        assert!(should_exclude(
            Path::new("a/b/nested.repos"),
            &excludes(&["elsewhere/nested.repos"])
        ));
    }

    #[test]
    fn test_unrelated_pattern() {
        assert!(!should_exclude(
            Path::new("a/b/nested.repos"),
            &excludes(&["c.repos"])
        ));
    }

    #[test]
    fn test_parent_directory_rule() {
        assert!(should_exclude(Path::new("ws/vendor/deps.repos"), &excludes(&["vendor"])));
        assert!(should_exclude(
            Path::new("ws/vendor/deps.repos"),
            &excludes(&["other/vendor"])
        ));
        // Only the immediate parent counts
        assert!(!should_exclude(
            Path::new("ws/vendor/pkg/deps.repos"),
            &excludes(&["x/vendor"])
        ));
    }

    #[test]
    fn test_prefix_rule() {
        assert!(should_exclude(Path::new("a/b/nested.repos"), &excludes(&["a/b"])));
        assert!(should_exclude(Path::new("a/b/c/d/nested.repos"), &excludes(&["a/b"])));
    }

    #[test]
    fn test_literal_prefix_crosses_segment_boundaries() {
        let matcher = ExclusionMatcher::new(["foo"], PrefixMatch::Literal);
        assert!(matcher.matches(Path::new("foobar/pkg/x.repos")));
    }

    #[test]
    fn test_segment_prefix_respects_boundaries() {
        let matcher = ExclusionMatcher::new(["foo"], PrefixMatch::Segment);
        assert!(!matcher.matches(Path::new("foobar/pkg/x.repos")));
        assert!(matcher.matches(Path::new("foo/pkg/x.repos")));
        assert!(matcher.matches(Path::new("./foo/pkg/x.repos")));
    }

    #[test]
    fn test_empty_list_never_excludes() {
        assert!(!should_exclude(Path::new("a/b/nested.repos"), &[]));
        assert!(!ExclusionMatcher::default().matches(Path::new("nested.repos")));
    }

    #[test]
    fn test_empty_pattern_never_excludes() {
        assert!(!should_exclude(Path::new("a/b/nested.repos"), &excludes(&[""])));
    }

    #[test]
    fn test_matcher_extend_and_report() {
        let mut matcher = ExclusionMatcher::new(Vec::<String>::new(), PrefixMatch::default());
        assert!(!matcher.matches(Path::new("B/nested.repos")));

        matcher.extend(["B/nested.repos"]);
        assert_eq!(
            matcher.matching_pattern(Path::new("B/nested.repos")),
            Some("B/nested.repos")
        );
        assert_eq!(matcher.patterns().len(), 1);
        assert_eq!(matcher.prefix_match(), PrefixMatch::Literal);
    }
}
