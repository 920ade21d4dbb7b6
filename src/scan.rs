//! Package discovery and manifest extraction.
//!
//! The scanner walks a directory tree, collects every package archive and
//! reads the manifest out of each one. Scanning never modifies anything on
//! disk.
//!
//! # Example
//!
//! ```rust,no_run
//! use nupin::scan::{ScanOptions, scan};
//!
//! for manifest in scan("./artifacts", &ScanOptions::default())? {
//!     println!("{} -> {}", manifest.archive_path().display(), manifest.entry_name());
//! }
//! # Ok::<(), nupin::Error>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::ZipArchive;

use crate::manifest::{
    DEFAULT_ARCHIVE_EXTENSION, DEFAULT_MANIFEST_EXTENSION, ManifestEntry, has_extension,
};
use crate::{Error, Result};

const UTF8_BOM: char = '\u{feff}';

/// Upper bound on the buffer reserved up front for a manifest.
const MAX_PREALLOCATION: usize = 1 << 20;

/// Options controlling which files are treated as packages and manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Extension of package archives, without the dot.
    pub archive_extension: String,
    /// Extension of the manifest entry inside a package, without the dot.
    pub manifest_extension: String,
    /// Whether symbolic links are followed while walking.
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            manifest_extension: DEFAULT_MANIFEST_EXTENSION.to_string(),
            follow_links: false,
        }
    }
}

impl ScanOptions {
    /// Creates options with the NuGet defaults (`.nupkg` / `.nuspec`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the package archive extension.
    pub fn archive_extension(mut self, extension: impl Into<String>) -> Self {
        self.archive_extension = trim_dot(extension.into());
        self
    }

    /// Sets the manifest entry extension.
    pub fn manifest_extension(mut self, extension: impl Into<String>) -> Self {
        self.manifest_extension = trim_dot(extension.into());
        self
    }

    /// Sets whether symbolic links are followed.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    fn is_archive(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.archive_extension))
    }
}

fn trim_dot(extension: String) -> String {
    match extension.strip_prefix('.') {
        Some(stripped) => stripped.to_string(),
        None => extension,
    }
}

/// Recursively lists the package archives under `root`.
///
/// Entries are visited in file-name order within each directory, so the
/// result is stable across runs.
///
/// # Errors
///
/// Returns [`Error::Discovery`] if `root` is not an existing directory or a
/// part of the tree cannot be read.
pub fn discover_archives(root: impl AsRef<Path>, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::Discovery {
            path: root.to_path_buf(),
            reason: if root.exists() {
                "not a directory".to_string()
            } else {
                "directory does not exist".to_string()
            },
        });
    }

    let mut archives = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| Error::Discovery {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            reason: e.to_string(),
        })?;

        if entry.file_type().is_file() && options.is_archive(entry.path()) {
            archives.push(entry.into_path());
        }
    }

    log::debug!(
        "found {} package(s) under '{}'",
        archives.len(),
        root.display()
    );
    Ok(archives)
}

/// Reads the manifest of a single package archive on disk.
///
/// Returns `Ok(None)` if the archive has no entry with the manifest
/// extension.
pub fn read_manifest(path: impl AsRef<Path>, options: &ScanOptions) -> Result<Option<ManifestEntry>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let found = find_manifest(BufReader::new(file), &options.manifest_extension)
        .map_err(|e| e.in_archive(path))?;

    match found {
        Some((entry_name, bytes)) => {
            let content = decode_manifest(bytes).ok_or_else(|| Error::InvalidManifestEncoding {
                path: path.to_path_buf(),
                entry: entry_name.clone(),
            })?;
            Ok(Some(ManifestEntry::new(path, entry_name, content)))
        }
        None => {
            log::debug!("no manifest in '{}', skipping", path.display());
            Ok(None)
        }
    }
}

/// Finds the first manifest entry of a zip stream and returns its name and
/// raw bytes.
///
/// Only the first matching entry in central-directory order is considered.
pub fn find_manifest<R: Read + Seek>(
    reader: R,
    manifest_extension: &str,
) -> Result<Option<(String, Vec<u8>)>> {
    let mut archive = ZipArchive::new(reader)?;

    // Raw access avoids decompressing entries just to look at their names.
    let mut index = None;
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        if entry.is_dir() || !has_extension(entry.name(), manifest_extension) {
            continue;
        }
        match &index {
            None => index = Some((i, entry.name().to_string())),
            Some((_, first)) => log::debug!("ignoring manifest '{}', using '{}'", entry.name(), first),
        }
    }

    let Some((i, name)) = index else {
        return Ok(None);
    };

    let mut entry = archive.by_index(i)?;
    let mut bytes = Vec::with_capacity(preallocation(entry.size()));
    entry.read_to_end(&mut bytes)?;
    Ok(Some((name, bytes)))
}

/// Capacity to reserve for an entry, given the size its header declares.
fn preallocation(declared: u64) -> usize {
    usize::try_from(declared).map_or(MAX_PREALLOCATION, |size| size.min(MAX_PREALLOCATION))
}

fn decode_manifest(bytes: Vec<u8>) -> Option<String> {
    let text = String::from_utf8(bytes).ok()?;
    match text.strip_prefix(UTF8_BOM) {
        Some(stripped) => Some(stripped.to_string()),
        None => Some(text),
    }
}

/// Scans `root` and returns the manifest of every package that has one.
///
/// Packages without a manifest are silently left out.
pub fn scan(root: impl AsRef<Path>, options: &ScanOptions) -> Result<Vec<ManifestEntry>> {
    let mut manifests = Vec::new();
    for archive in discover_archives(root, options)? {
        if let Some(manifest) = read_manifest(&archive, options)? {
            manifests.push(manifest);
        }
    }
    Ok(manifests)
}
