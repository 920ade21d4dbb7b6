//! Manifest transformation: pinning dependency versions.
//!
//! A [`ManifestPinner`] parses a manifest, collects the dependencies selected
//! by its [`IdFilter`], rewrites their `version` attribute to the bracketed
//! exact form and serializes the document again.
//!
//! # Example
//!
//! ```rust
//! use nupin::{ManifestEntry, ManifestPinner};
//!
//! let manifest = ManifestEntry::new(
//!     "Castle.Windsor.nupkg",
//!     "Castle.Windsor.nuspec",
//!     r#"<package><metadata><dependencies>
//!          <dependency id="Castle.Core" version="1.2.3" />
//!        </dependencies></metadata></package>"#,
//! );
//!
//! let outcome = ManifestPinner::new("castle.core").pin(&manifest)?;
//! assert!(outcome.manifest.content().contains(r#"version="[1.2.3]""#));
//! assert_eq!(outcome.pinned.len(), 1);
//! # Ok::<(), nupin::Error>(())
//! ```
//!
//! # Formatting
//!
//! The output is always re-serialized with indentation, an XML declaration
//! and UTF-8 encoding, even when nothing was pinned. Whitespace is
//! normalized; serializing the output again yields the same text. Comments,
//! processing instructions and CDATA sections are kept, including those
//! outside the root element.

mod document;
mod filter;
mod walk;

pub use document::Document;

pub use filter::{
    DEPENDENCY_TAG, ID_ATTRIBUTE, IdFilter, VERSION_ATTRIBUTE, is_dependency, pin_version,
    qualified_name,
};
pub use walk::{MissingAttribute, PinCandidate, Visit, Walk, apply_candidates, collect_candidates};

use crate::manifest::ManifestEntry;
use crate::{Error, Result};

/// Default indentation of serialized manifests.
pub const DEFAULT_INDENT: &str = "  ";

/// A dependency whose version was pinned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedDependency {
    /// Dependency id as written in the manifest.
    pub id: String,
    /// Version before pinning.
    pub from: String,
    /// Version after pinning.
    pub to: String,
}

impl From<PinCandidate> for PinnedDependency {
    fn from(candidate: PinCandidate) -> Self {
        Self {
            id: candidate.id,
            from: candidate.version,
            to: candidate.pinned,
        }
    }
}

/// Result of transforming one manifest.
#[must_use = "the transformed manifest must be written back to take effect"]
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    /// The manifest with its new content.
    pub manifest: ManifestEntry,
    /// Dependencies that were pinned, in document order.
    pub pinned: Vec<PinnedDependency>,
}

impl TransformOutcome {
    /// Returns whether any dependency was pinned.
    pub fn changed(&self) -> bool {
        !self.pinned.is_empty()
    }
}

/// Pins the versions of selected dependencies in manifests.
#[derive(Debug, Clone)]
pub struct ManifestPinner {
    filter: IdFilter,
    indent: String,
}

impl ManifestPinner {
    /// Creates a pinner selecting dependencies by id prefix.
    pub fn new(filter: impl Into<IdFilter>) -> Self {
        Self {
            filter: filter.into(),
            indent: DEFAULT_INDENT.to_string(),
        }
    }

    /// Sets the indentation used when serializing.
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Returns the id filter.
    pub fn filter(&self) -> &IdFilter {
        &self.filter
    }

    /// Transforms one manifest, returning a new record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the content is not well-formed XML and
    /// [`Error::MissingAttribute`] if a dependency element cannot be
    /// evaluated.
    pub fn pin(&self, manifest: &ManifestEntry) -> Result<TransformOutcome> {
        let mut document =
            Document::parse(manifest.content().as_bytes()).map_err(|source| Error::Parse {
                path: manifest.archive_path().to_path_buf(),
                entry: manifest.entry_name().to_string(),
                source,
            })?;

        let candidates =
            collect_candidates(&document.root, &self.filter).map_err(|missing| Error::MissingAttribute {
                path: manifest.archive_path().to_path_buf(),
                entry: manifest.entry_name().to_string(),
                location: missing.location,
                attribute: missing.attribute,
            })?;

        apply_candidates(&mut document.root, &candidates);
        let content = serialize(&document, &self.indent)?;

        let pinned: Vec<PinnedDependency> =
            candidates.into_iter().map(PinnedDependency::from).collect();
        for dependency in &pinned {
            log::debug!(
                "{}: {} {} -> {}",
                manifest.archive_path().display(),
                dependency.id,
                dependency.from,
                dependency.to
            );
        }

        Ok(TransformOutcome {
            manifest: manifest.with_content(content),
            pinned,
        })
    }
}

/// Serializes a document with indentation and an XML declaration.
pub fn serialize(document: &Document, indent: &str) -> Result<String> {
    document.to_string_indented(indent)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUSPEC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <id>Castle.Windsor</id>
    <version>6.0.0</version>
    <dependencies>
      <group targetFramework=".NETStandard2.0">
        <dependency id="Castle.Core" version="5.1.1" exclude="Build,Analyzers" />
        <dependency id="Castle.Core.AsyncInterceptor" version="[2.1.0]" />
        <dependency id="Microsoft.Extensions.Logging" version="6.0.0" />
      </group>
    </dependencies>
  </metadata>
</package>"#;

    fn manifest(content: &str) -> ManifestEntry {
        ManifestEntry::new("pkg.nupkg", "pkg.nuspec", content)
    }

    #[test]
    fn test_pin_selected_dependencies() {
        let outcome = ManifestPinner::new("castle.").pin(&manifest(NUSPEC)).unwrap();

        assert_eq!(
            outcome.pinned,
            vec![PinnedDependency {
                id: "Castle.Core".into(),
                from: "5.1.1".into(),
                to: "[5.1.1]".into(),
            }]
        );
        let content = outcome.manifest.content();
        assert!(content.contains(r#"version="[5.1.1]""#));
        assert!(content.contains(r#"version="[2.1.0]""#));
        assert!(content.contains(r#"version="6.0.0""#));
        assert!(content.contains(r#"exclude="Build,Analyzers""#));
        assert!(content.contains(">Castle.Windsor</id>"));
    }

    #[test]
    fn test_pin_keeps_attribute_order() {
        let outcome = ManifestPinner::new("castle.core")
            .pin(&manifest(
                r#"<dependency exclude="Build" id="Castle.Core" version="1.0" include="All" />"#,
            ))
            .unwrap();
        assert!(
            outcome
                .manifest
                .content()
                .contains(r#"exclude="Build" id="Castle.Core" version="[1.0]" include="All""#)
        );
    }

    #[test]
    fn test_pin_output_is_stable() {
        let pinner = ManifestPinner::new("castle.");
        let once = pinner.pin(&manifest(NUSPEC)).unwrap();
        let twice = pinner.pin(&once.manifest).unwrap();

        assert!(once.changed());
        assert!(!twice.changed());
        assert_eq!(once.manifest.content(), twice.manifest.content());
    }

    #[test]
    fn test_pin_without_match_still_reserializes() {
        let outcome = ManifestPinner::new("nothing")
            .pin(&manifest("<package><metadata/></package>"))
            .unwrap();
        assert!(!outcome.changed());
        assert!(outcome.manifest.content().starts_with("<?xml"));
    }

    #[test]
    fn test_pin_custom_indent() {
        let outcome = ManifestPinner::new("a")
            .indent("\t")
            .pin(&manifest(r#"<g><dependency id="a" version="1" /></g>"#))
            .unwrap();
        assert!(outcome.manifest.content().contains("\n\t<dependency"));
    }

    #[test]
    fn test_pin_keeps_comments_outside_root() {
        let content = NUSPEC.replacen(
            "<package ",
            "<!-- Copyright 2004-2021 Castle Project - http://www.castleproject.org/ -->\n<package ",
            1,
        ) + "\n<!-- generated -->";

        let outcome = ManifestPinner::new("castle.").pin(&manifest(&content)).unwrap();
        let out = outcome.manifest.content();

        assert!(out.starts_with("<?xml"), "{out}");
        let copyright = out
            .find("<!-- Copyright 2004-2021 Castle Project - http://www.castleproject.org/ -->")
            .unwrap();
        let package = out.find("<package").unwrap();
        let trailer = out.find("<!-- generated -->").unwrap();
        assert!(copyright < package && package < trailer, "{out}");
        assert!(out.contains(r#"version="[5.1.1]""#));
    }

    #[test]
    fn test_pin_keeps_cdata() {
        let outcome = ManifestPinner::new("a")
            .pin(&manifest(
                r#"<package><metadata><releaseNotes><![CDATA[Fixed <T> & more]]></releaseNotes><dependencies><dependency id="a" version="1" /></dependencies></metadata></package>"#,
            ))
            .unwrap();
        let out = outcome.manifest.content();
        assert!(out.contains("<![CDATA[Fixed <T> & more]]>"), "{out}");
        assert!(out.contains(r#"version="[1]""#));
    }

    #[test]
    fn test_pin_malformed_manifest() {
        let err = ManifestPinner::new("a")
            .pin(&manifest("<package><metadata></package>"))
            .unwrap_err();
        match err {
            Error::Parse { path, entry, .. } => {
                assert_eq!(path, std::path::PathBuf::from("pkg.nupkg"));
                assert_eq!(entry, "pkg.nuspec");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_pin_missing_id() {
        let err = ManifestPinner::new("a")
            .pin(&manifest(r#"<dependencies><dependency version="1" /></dependencies>"#))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute {
                attribute: "id",
                ..
            }
        ));
    }
}
