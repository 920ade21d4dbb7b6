//! Property-based tests using proptest.
//!
//! These tests verify invariants of the pin rule, the id filter and the
//! manifest transform using randomly generated inputs.

use std::path::PathBuf;

use nupin::{IdFilter, ManifestEntry, ManifestPinner, pin_version};
use proptest::prelude::*;

/// Strategy for version-like strings, brackets included.
fn version_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,3}(\\.[0-9]{1,3}){0,3}(-[a-z]{1,6})?",
        "[\\[(]?[0-9]{1,3}(\\.[0-9]{1,3}){0,2}(,[0-9]{0,3})?[\\])]?",
    ]
}

/// Strategy for package ids.
fn id_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,8}(\\.[A-Za-z][A-Za-z0-9]{0,8}){0,2}"
}

fn manifest(dependencies: &[(String, String)]) -> ManifestEntry {
    let mut deps = String::new();
    for (id, version) in dependencies {
        deps.push_str(&format!(
            "<dependency id=\"{}\" version=\"{}\"/>",
            id, version
        ));
    }
    let content = format!(
        "<package><metadata><dependencies>{}</dependencies></metadata></package>",
        deps
    );
    ManifestEntry::new(PathBuf::from("pkg.nupkg"), "pkg.nuspec", content)
}

proptest! {
    /// Pinning never applies twice.
    #[test]
    fn pin_version_is_idempotent(version in version_strategy()) {
        if let Some(pinned) = pin_version(&version) {
            prop_assert_eq!(pin_version(&pinned), None);
        }
    }

    /// A pinned value wraps the original in brackets.
    #[test]
    fn pin_version_wraps_original(version in version_strategy()) {
        match pin_version(&version) {
            Some(pinned) => {
                prop_assert_eq!(pinned, format!("[{}]", version));
            }
            None => {
                prop_assert!(version.starts_with('[') || version.ends_with(']'));
            }
        }
    }

    /// Half-bracketed values are left alone.
    #[test]
    fn half_bracketed_untouched(core in "[0-9]{1,3}(\\.[0-9]{1,3}){0,2}") {
        let open = format!("[{}", core);
        let close = format!("{}]", core);
        prop_assert_eq!(pin_version(&open), None);
        prop_assert_eq!(pin_version(&close), None);
    }

    /// A lower-case prefix of an id always selects it, whatever the id's case.
    #[test]
    fn lowercase_prefix_matches(id in id_strategy(), len in 1usize..4) {
        let lower = id.to_lowercase();
        let prefix: String = lower.chars().take(len).collect();
        prop_assert!(IdFilter::new(prefix).matches(&id));
    }

    /// The empty filter selects every non-empty id.
    #[test]
    fn empty_filter_matches_all(id in id_strategy()) {
        prop_assert!(IdFilter::new("").matches(&id));
    }

    /// Transforming a transformed manifest pins nothing further.
    #[test]
    fn transform_is_idempotent(
        dependencies in proptest::collection::vec((id_strategy(), version_strategy()), 0..6),
        filter in "[a-z]{0,2}",
    ) {
        let pinner = ManifestPinner::new(filter.as_str());
        let first = pinner.pin(&manifest(&dependencies)).unwrap();
        let second = pinner.pin(&first.manifest).unwrap();

        prop_assert!(second.pinned.is_empty());
        prop_assert_eq!(first.manifest.content(), second.manifest.content());
    }

    /// Exactly the selected, unpinned dependencies are reported.
    #[test]
    fn transform_reports_selected_dependencies(
        dependencies in proptest::collection::vec((id_strategy(), version_strategy()), 0..6),
        filter in "[a-z]{0,2}",
    ) {
        let filter = IdFilter::new(filter);
        let expected: Vec<_> = dependencies
            .iter()
            .filter(|(id, version)| filter.matches(id) && pin_version(version).is_some())
            .map(|(id, _)| id.clone())
            .collect();

        let outcome = ManifestPinner::new(filter).pin(&manifest(&dependencies)).unwrap();
        let pinned: Vec<_> = outcome.pinned.into_iter().map(|d| d.id).collect();
        prop_assert_eq!(pinned, expected);
    }
}
