//! Batch pinning over a directory of packages.
//!
//! A batch runs the three stages one after another over every package found
//! under a root directory:
//!
//! 1. scan: read the manifest of every package
//! 2. transform: pin the selected dependencies of every manifest
//! 3. rewrite: write every transformed manifest back into its package
//!
//! Every manifest is transformed before the first package is rewritten, so a
//! malformed manifest anywhere in the batch aborts it with nothing on disk
//! modified. Packages are processed strictly one at a time.

mod options;

pub use options::PinOptions;

use std::path::{Path, PathBuf};

use crate::Result;
use crate::pin::{PinnedDependency, TransformOutcome};
use crate::progress::{NoProgress, ProgressReporter};
use crate::rewrite::rewrite_archive;
use crate::scan::{discover_archives, read_manifest};

/// What happened to one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Package path.
    pub path: PathBuf,
    /// Name of the manifest entry inside the package.
    pub manifest_entry: String,
    /// Dependencies pinned in the manifest, in document order.
    pub pinned: Vec<PinnedDependency>,
    /// Whether the package on disk was replaced.
    pub rewritten: bool,
    /// Entries copied unchanged into the new package.
    pub entries_copied: usize,
}

/// Summary of a batch run.
#[must_use = "batch report should be checked to verify what was changed"]
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Directory that was scanned.
    pub root: PathBuf,
    /// Number of package files found.
    pub archives_found: usize,
    /// One report per package that has a manifest, in scan order.
    pub archives: Vec<ArchiveReport>,
    /// Whether the batch ran in dry-run mode.
    pub dry_run: bool,
}

impl BatchReport {
    /// Returns the number of packages without a manifest.
    pub fn archives_without_manifest(&self) -> usize {
        self.archives_found - self.archives.len()
    }

    /// Returns the number of packages replaced on disk.
    pub fn archives_rewritten(&self) -> usize {
        self.archives.iter().filter(|a| a.rewritten).count()
    }

    /// Returns the total number of dependencies pinned.
    pub fn dependencies_pinned(&self) -> usize {
        self.archives.iter().map(|a| a.pinned.len()).sum()
    }
}

/// Pins the selected dependencies of every package under `root`.
///
/// # Example
///
/// ```rust,no_run
/// use nupin::{PinOptions, pin_directory};
///
/// let report = pin_directory("./artifacts", &PinOptions::new("castle.core"))?;
/// println!(
///     "{} dependencies pinned in {} packages",
///     report.dependencies_pinned(),
///     report.archives_rewritten()
/// );
/// # Ok::<(), nupin::Error>(())
/// ```
///
/// # Errors
///
/// The batch stops at the first error. See [`Error`](crate::Error) for the
/// possible causes.
pub fn pin_directory(root: impl AsRef<Path>, options: &PinOptions) -> Result<BatchReport> {
    pin_directory_with_progress(root, options, &mut NoProgress)
}

/// Same as [`pin_directory`], reporting progress to `progress`.
pub fn pin_directory_with_progress(
    root: impl AsRef<Path>,
    options: &PinOptions,
    progress: &mut dyn ProgressReporter,
) -> Result<BatchReport> {
    let root = root.as_ref();

    let archives = discover_archives(root, &options.scan)?;
    let mut manifests = Vec::with_capacity(archives.len());
    for path in &archives {
        if let Some(manifest) = read_manifest(path, &options.scan)? {
            manifests.push(manifest);
        }
    }
    progress.on_total(manifests.len());

    let pinner = options.pinner();
    let outcomes = manifests
        .iter()
        .map(|manifest| pinner.pin(manifest))
        .collect::<Result<Vec<_>>>()?;

    let mut reports = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        progress.on_archive_start(outcome.manifest.archive_path());
        let report = write_outcome(outcome, options, progress)?;
        progress.on_archive_complete(&report);
        reports.push(report);
    }

    Ok(BatchReport {
        root: root.to_path_buf(),
        archives_found: archives.len(),
        archives: reports,
        dry_run: options.dry_run,
    })
}

fn write_outcome(
    outcome: TransformOutcome,
    options: &PinOptions,
    progress: &mut dyn ProgressReporter,
) -> Result<ArchiveReport> {
    let path = outcome.manifest.archive_path();

    let skip = if options.dry_run {
        Some("dry run")
    } else if options.skip_unchanged && !outcome.changed() {
        Some("nothing to pin")
    } else {
        None
    };

    let (rewritten, entries_copied) = match skip {
        Some(reason) => {
            log::debug!("leaving '{}' untouched: {}", path.display(), reason);
            (false, 0)
        }
        None => {
            let result = rewrite_archive(&outcome.manifest)?;
            if result.entries_replaced != 1 {
                progress.on_warning(&format!(
                    "'{}': expected one manifest entry, replaced {}",
                    path.display(),
                    result.entries_replaced
                ));
            }
            (true, result.entries_copied)
        }
    };

    Ok(ArchiveReport {
        path: path.to_path_buf(),
        manifest_entry: outcome.manifest.entry_name().to_string(),
        pinned: outcome.pinned,
        rewritten,
        entries_copied,
    })
}
