//! Options for batch pinning.

use crate::pin::{DEFAULT_INDENT, IdFilter, ManifestPinner};
use crate::scan::ScanOptions;

/// Configuration of a batch run over a directory of packages.
///
/// # Example
///
/// ```rust
/// use nupin::PinOptions;
///
/// let options = PinOptions::new("castle.")
///     .archive_extension("nupkg")
///     .indent("    ")
///     .dry_run(true);
/// assert!(options.dry_run);
/// ```
#[derive(Debug, Clone)]
pub struct PinOptions {
    /// Identifier prefix selecting the dependencies to pin.
    pub filter: IdFilter,
    /// Package and manifest discovery settings.
    pub scan: ScanOptions,
    /// Indentation of rewritten manifests.
    pub indent: String,
    /// Transform manifests but leave packages on disk untouched.
    pub dry_run: bool,
    /// Leave packages alone when none of their dependencies was pinned.
    ///
    /// By default every package with a manifest is rewritten, which also
    /// normalizes the manifest's formatting.
    pub skip_unchanged: bool,
}

impl PinOptions {
    /// Creates options pinning dependencies whose id starts with `filter`.
    pub fn new(filter: impl Into<IdFilter>) -> Self {
        Self {
            filter: filter.into(),
            scan: ScanOptions::default(),
            indent: DEFAULT_INDENT.to_string(),
            dry_run: false,
            skip_unchanged: false,
        }
    }

    /// Sets the package archive extension.
    pub fn archive_extension(mut self, extension: impl Into<String>) -> Self {
        self.scan = self.scan.archive_extension(extension);
        self
    }

    /// Sets the manifest entry extension.
    pub fn manifest_extension(mut self, extension: impl Into<String>) -> Self {
        self.scan = self.scan.manifest_extension(extension);
        self
    }

    /// Sets whether symbolic links are followed while scanning.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.scan = self.scan.follow_links(follow);
        self
    }

    /// Sets the indentation of rewritten manifests.
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Enables or disables dry-run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enables or disables skipping packages with nothing to pin.
    pub fn skip_unchanged(mut self, skip: bool) -> Self {
        self.skip_unchanged = skip;
        self
    }

    /// Builds the manifest pinner described by these options.
    pub fn pinner(&self) -> ManifestPinner {
        ManifestPinner::new(self.filter.clone()).indent(self.indent.clone())
    }
}
