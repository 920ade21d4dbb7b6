//! Error types for package pinning operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when scanning, transforming and rewriting package archives,
//! along with a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. A batch
//! stops at the first error; every variant that originates from a specific
//! archive carries its path so the failing package can be identified.
//!
//! ```rust,no_run
//! use nupin::{Error, PinOptions, pin_directory};
//!
//! fn run(dir: &str) -> nupin::Result<()> {
//!     match pin_directory(dir, &PinOptions::new("castle.")) {
//!         Ok(report) => {
//!             println!("Pinned {} dependencies", report.dependencies_pinned());
//!             Ok(())
//!         }
//!         Err(Error::Parse { path, entry, .. }) => {
//!             eprintln!("{} in {} is not valid XML", entry, path.display());
//!             Ok(())
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;

use zip::result::ZipError;

/// The main error type for package pinning operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | Discovery | [`Discovery`][Self::Discovery] | Root directory missing or unreadable |
/// | Container | [`Zip`][Self::Zip], [`Archive`][Self::Archive], [`EntryNotFound`][Self::EntryNotFound] | Damaged or unexpected package |
/// | Manifest | [`InvalidManifestEncoding`][Self::InvalidManifestEncoding], [`Parse`][Self::Parse], [`MissingAttribute`][Self::MissingAttribute] | Malformed `.nuspec` |
/// | Output | [`Serialize`][Self::Serialize], [`Persist`][Self::Persist], [`Io`][Self::Io] | Disk full, permissions |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The directory to scan does not exist, is not a directory, or could
    /// not be walked.
    #[error("Cannot scan '{}': {reason}", path.display())]
    Discovery {
        /// The directory that was being scanned.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// A zip container operation failed on an in-memory or streamed archive.
    ///
    /// File-level operations report [`Error::Archive`] instead, which adds
    /// the path of the package on disk.
    #[error("Zip error: {0}")]
    Zip(#[from] ZipError),

    /// A package archive on disk could not be read or written as a zip.
    #[error("Invalid package archive '{}': {source}", path.display())]
    Archive {
        /// The package file.
        path: PathBuf,
        /// The underlying zip error.
        #[source]
        source: ZipError,
    },

    /// The manifest entry does not contain UTF-8 text.
    #[error("Manifest '{entry}' in '{}' is not valid UTF-8", path.display())]
    InvalidManifestEncoding {
        /// The package file.
        path: PathBuf,
        /// The manifest entry name inside the package.
        entry: String,
    },

    /// The manifest is not well-formed XML.
    #[error("Cannot parse manifest '{entry}' in '{}': {source}", path.display())]
    Parse {
        /// The package file.
        path: PathBuf,
        /// The manifest entry name inside the package.
        entry: String,
        /// The underlying XML parse error.
        #[source]
        source: xmltree::ParseError,
    },

    /// A `dependency` element lacks an attribute required to evaluate it.
    ///
    /// An element without `id` always fails; an element without `version`
    /// fails only once its `id` matched the filter.
    #[error("Element '{location}' in manifest '{entry}' of '{}' has no '{attribute}' attribute", path.display())]
    MissingAttribute {
        /// The package file.
        path: PathBuf,
        /// The manifest entry name inside the package.
        entry: String,
        /// Slash-separated element location, e.g. `package/metadata/dependencies/dependency`.
        location: String,
        /// The missing attribute name.
        attribute: &'static str,
    },

    /// The transformed manifest could not be serialized.
    #[error("Cannot serialize manifest: {0}")]
    Serialize(#[from] xmltree::Error),

    /// The recorded manifest entry is no longer present in the archive.
    #[error("Entry not found: {path}")]
    EntryNotFound {
        /// The entry name that was expected.
        path: String,
    },

    /// The rewritten archive could not be moved over the original.
    ///
    /// The original package is left untouched when this error occurs.
    #[error("Cannot replace '{}': {source}", path.display())]
    Persist {
        /// The package file that was being replaced.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Attaches a package path to a bare zip error.
    pub(crate) fn in_archive(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Error::Zip(source) => Error::Archive {
                path: path.into(),
                source,
            },
            other => other,
        }
    }

    /// Returns the package path associated with this error, if any.
    pub fn archive_path(&self) -> Option<&std::path::Path> {
        match self {
            Error::Archive { path, .. }
            | Error::InvalidManifestEncoding { path, .. }
            | Error::Parse { path, .. }
            | Error::MissingAttribute { path, .. }
            | Error::Persist { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// A specialized Result type for pinning operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_archive_wraps_zip_errors() {
        let err = Error::Zip(ZipError::FileNotFound).in_archive("pkgs/a.nupkg");
        match &err {
            Error::Archive { path, .. } => assert_eq!(path, &PathBuf::from("pkgs/a.nupkg")),
            other => panic!("unexpected variant: {other:?}"),
        }
        assert_eq!(
            err.archive_path(),
            Some(std::path::Path::new("pkgs/a.nupkg"))
        );
    }

    #[test]
    fn test_in_archive_keeps_other_errors() {
        let err = Error::EntryNotFound {
            path: "a.nuspec".into(),
        }
        .in_archive("a.nupkg");
        assert!(matches!(err, Error::EntryNotFound { .. }));
        assert!(err.archive_path().is_none());
    }

    #[test]
    fn test_missing_attribute_display() {
        let err = Error::MissingAttribute {
            path: PathBuf::from("a.nupkg"),
            entry: "a.nuspec".into(),
            location: "package/metadata/dependencies/dependency".into(),
            attribute: "id",
        };
        let msg = err.to_string();
        assert!(msg.contains("'id'"));
        assert!(msg.contains("package/metadata/dependencies/dependency"));
    }
}
