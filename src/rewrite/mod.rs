//! Writing transformed manifests back into package archives.
//!
//! This module produces a new archive for each package in which the manifest
//! entry carries the transformed text and every other entry is copied
//! byte-for-byte, then swaps it in place of the original.
//!
//! # Example
//!
//! ```rust,no_run
//! use nupin::scan::{ScanOptions, read_manifest};
//! use nupin::{ManifestPinner, rewrite::rewrite_archive};
//!
//! let manifest = read_manifest("Castle.Windsor.nupkg", &ScanOptions::default())?
//!     .expect("package has a manifest");
//! let outcome = ManifestPinner::new("castle.core").pin(&manifest)?;
//! let result = rewrite_archive(&outcome.manifest)?;
//! println!("Copied {} entries", result.entries_copied);
//! # Ok::<(), nupin::Error>(())
//! ```
//!
//! # Implementation Notes
//!
//! The rewrite works by:
//! 1. Opening the original archive and checking the manifest entry exists
//! 2. Writing a temporary archive next to the original
//! 3. Raw-copying unchanged entries, so compressed bytes and CRCs match
//! 4. Deflating the new manifest under its original name and position
//! 5. Renaming the temporary archive over the original

mod replace;
mod rewriter;

pub use replace::replace_file;
pub use rewriter::{ArchiveRewriter, RewriteResult, rewrite_archive_to};

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use crate::Result;
use crate::manifest::ManifestEntry;

/// Replaces the manifest of a package on disk with `manifest`'s content.
///
/// # Errors
///
/// Fails with [`Error::Archive`](crate::Error::Archive) if the package is
/// not a readable zip, [`Error::EntryNotFound`](crate::Error::EntryNotFound)
/// if the recorded manifest entry is gone, and
/// [`Error::Persist`](crate::Error::Persist) if the swap fails. The original
/// package is untouched in every failure case.
pub fn rewrite_archive(manifest: &ManifestEntry) -> Result<RewriteResult> {
    let path = manifest.archive_path();
    let source = BufReader::new(File::open(path)?);

    let mut rewriter = ArchiveRewriter::new(source).map_err(|e| e.in_archive(path))?;
    rewriter.replace(manifest.entry_name(), manifest.content().as_bytes())?;

    // `apply` consumes the rewriter, so the original is closed before the rename.
    let result = replace_file(path, |file| {
        let mut output = BufWriter::new(file);
        let result = rewriter.apply(&mut output)?;
        output.flush()?;
        Ok(result)
    })
    .map_err(|e| e.in_archive(path))?;

    log::info!(
        "rewrote '{}' ({} entries copied)",
        path.display(),
        result.entries_copied
    );
    Ok(result)
}
