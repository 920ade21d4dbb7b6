//! Per-package manifest record passed between pipeline stages.

use std::path::{Path, PathBuf};

/// Default extension of package archives.
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "nupkg";

/// Default extension of the manifest entry inside a package.
pub const DEFAULT_MANIFEST_EXTENSION: &str = "nuspec";

/// The manifest of one package archive.
///
/// A record associates the archive on disk with the name of the entry
/// holding its manifest and the manifest text. Records are never mutated in
/// place: each stage that changes the text returns a new record via
/// [`with_content`](Self::with_content).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    archive_path: PathBuf,
    entry_name: String,
    content: String,
}

impl ManifestEntry {
    /// Creates a new record.
    pub fn new(
        archive_path: impl Into<PathBuf>,
        entry_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            archive_path: archive_path.into(),
            entry_name: entry_name.into(),
            content: content.into(),
        }
    }

    /// Path of the package archive on disk.
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Exact name of the manifest entry inside the archive.
    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// Manifest text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns a record for the same archive entry with different text.
    #[must_use]
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            archive_path: self.archive_path.clone(),
            entry_name: self.entry_name.clone(),
            content: content.into(),
        }
    }
}

/// Returns whether an entry name ends with `.{extension}`, ignoring case.
pub(crate) fn has_extension(name: &str, extension: &str) -> bool {
    let suffix_len = extension.len() + 1;
    if name.len() < suffix_len || !name.is_char_boundary(name.len() - suffix_len) {
        return false;
    }
    let suffix = &name[name.len() - suffix_len..];
    suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_content_keeps_location() {
        let entry = ManifestEntry::new("/pkgs/a.nupkg", "A.nuspec", "<package/>");
        let updated = entry.with_content("<package></package>");

        assert_eq!(updated.archive_path(), entry.archive_path());
        assert_eq!(updated.entry_name(), "A.nuspec");
        assert_eq!(updated.content(), "<package></package>");
        assert_eq!(entry.content(), "<package/>");
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("Castle.Core.nuspec", "nuspec"));
        assert!(has_extension("Castle.Core.NuSpec", "nuspec"));
        assert!(has_extension("nested/dir/pkg.NUSPEC", "nuspec"));
        assert!(!has_extension("nuspec", "nuspec"));
        assert!(!has_extension("pkg.nuspec.bak", "nuspec"));
        assert!(!has_extension("pkgnuspec", "nuspec"));
        assert!(!has_extension("", "nuspec"));
    }
}
