//! Crash-safe replacement of files on disk.

use std::fs::{self, File};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Replaces the file at `path` with content produced by `write`.
///
/// The new content is written to a temporary file in the same directory,
/// synced, given the original's permissions and then renamed over `path`.
/// The original stays in place until the rename, and the temporary file is
/// removed if anything fails before it.
///
/// If `path` is a symbolic link, the file it points to is replaced and the
/// link is left as it is.
pub fn replace_file<T>(path: &Path, write: impl FnOnce(&mut File) -> Result<T>) -> Result<T> {
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(_) => path.to_path_buf(),
    };
    let path = target.as_path();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    let value = write(temp.as_file_mut())?;
    temp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(path).map_err(|e| Error::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(value)
}
