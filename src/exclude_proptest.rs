//! Property-based tests for exclusion matching and path normalization.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use std::path::{Path, PathBuf};

    use crate::exclude::{should_exclude, ExclusionMatcher, PrefixMatch};
    use crate::path::{normalize, workspace_join};
    use proptest::prelude::*;

    // Relative paths of one to four short segments
    const SEGMENTS: &str = "[a-z]{1,4}(/[a-z]{1,4}){0,3}";

    // ============================================================================
    // should_exclude property tests
    // ============================================================================

    proptest! {
        /// Property: an empty exclusion list never excludes anything
        #[test]
        fn empty_list_never_excludes(dir in SEGMENTS, name in "[a-z]{1,8}") {
            let candidate = PathBuf::from(format!("{dir}/{name}.repos"));
            prop_assert!(!should_exclude(&candidate, &[]));
        }

        /// Property: a manifest is always excluded by its own file name
        #[test]
        fn file_name_always_excludes(dir in SEGMENTS, name in "[a-z]{1,8}") {
            let file_name = format!("{name}.repos");
            let candidate = PathBuf::from(format!("{dir}/{file_name}"));
            prop_assert!(should_exclude(&candidate, &[file_name]));
        }

        /// Property: a manifest is always excluded by its own path
        #[test]
        fn full_path_always_excludes(dir in SEGMENTS, name in "[a-z]{1,8}") {
            let path = format!("{dir}/{name}.repos");
            prop_assert!(should_exclude(Path::new(&path), &[path.clone()]));
        }

        /// Property: any directory above a manifest excludes it
        #[test]
        fn ancestor_directory_excludes(dir in SEGMENTS, name in "[a-z]{1,8}") {
            let candidate = PathBuf::from(format!("{dir}/{name}.repos"));
            for ancestor in candidate.ancestors().skip(1) {
                if ancestor.as_os_str().is_empty() {
                    continue;
                }
                let pattern = ancestor.to_string_lossy().into_owned();
                prop_assert!(
                    should_exclude(&candidate, &[pattern.clone()]),
                    "{} should be excluded by {}",
                    candidate.display(),
                    pattern
                );
                let segment = ExclusionMatcher::new([pattern], PrefixMatch::Segment);
                prop_assert!(segment.matches(&candidate));
            }
        }

        /// Property: adding patterns never un-excludes a path
        #[test]
        fn more_patterns_exclude_at_least_as_much(
            candidate in SEGMENTS,
            first in prop::collection::vec(SEGMENTS, 0..4),
            extra in prop::collection::vec(SEGMENTS, 0..4),
        ) {
            let candidate = PathBuf::from(format!("{candidate}.repos"));
            let mut all = first.clone();
            all.extend(extra);
            if should_exclude(&candidate, &first) {
                prop_assert!(should_exclude(&candidate, &all));
            }
        }

        /// Property: segment-aware prefixes exclude a subset of what literal
        /// prefixes exclude
        #[test]
        fn segment_mode_is_stricter(
            candidate in SEGMENTS,
            patterns in prop::collection::vec(SEGMENTS, 1..4),
        ) {
            let candidate = PathBuf::from(format!("{candidate}.repos"));
            let literal = ExclusionMatcher::new(patterns.clone(), PrefixMatch::Literal);
            let segment = ExclusionMatcher::new(patterns, PrefixMatch::Segment);
            if segment.matches(&candidate) {
                prop_assert!(literal.matches(&candidate));
            }
        }
    }

    // ============================================================================
    // path normalization property tests
    // ============================================================================

    proptest! {
        /// Property: normalize is idempotent
        #[test]
        fn normalize_is_idempotent(path in "(\\./)?[a-z]{1,4}(/(\\.|[a-z]{1,4})){0,4}") {
            let once = normalize(Path::new(&path));
            let twice = normalize(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: joining onto "." yields the manifest key unchanged
        #[test]
        fn workspace_join_on_dot_is_the_key(key in SEGMENTS) {
            prop_assert_eq!(workspace_join(Path::new("."), &key), PathBuf::from(&key));
        }

        /// Property: whatever the key, the target stays under the root
        #[test]
        fn workspace_join_never_leaves_root(key in "(/|\\.\\./|\\./)?([a-z]{1,4}|\\.\\.)(/([a-z]{1,4}|\\.\\.)){0,4}") {
            let target = workspace_join(Path::new("ws"), &key);
            prop_assert!(target.starts_with("ws"));
            prop_assert!(!target.components().any(|c| c == std::path::Component::ParentDir));
        }
    }
}
