//! Archive rewriter for substituting entries in existing packages.

use std::collections::HashMap;
use std::io::{Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::{Error, Result};

/// Result of a rewrite operation.
#[must_use = "rewrite result should be checked to verify operation completed as expected"]
#[derive(Debug, Clone, Default)]
pub struct RewriteResult {
    /// Number of entries copied unchanged (raw, without recompression).
    pub entries_copied: usize,
    /// Number of entries whose content was replaced.
    pub entries_replaced: usize,
    /// Compressed bytes copied from the original archive.
    pub bytes_copied: u64,
    /// Uncompressed bytes written for replaced entries.
    pub bytes_replaced: u64,
}

impl RewriteResult {
    /// Returns the total number of entries in the resulting archive.
    pub fn total_entries(&self) -> usize {
        self.entries_copied + self.entries_replaced
    }
}

/// Rewrites a zip archive with some entries replaced.
///
/// Replacements are queued and only applied when [`apply`](Self::apply) is
/// called. Every other entry is copied in its original order with its
/// compressed bytes, compression method, CRC and metadata untouched.
///
/// # Example
///
/// ```rust,no_run
/// use nupin::rewrite::ArchiveRewriter;
/// use std::fs::File;
///
/// let mut rewriter = ArchiveRewriter::new(File::open("Castle.Core.nupkg")?)?;
/// rewriter.replace("Castle.Core.nuspec", b"<package/>".to_vec())?;
///
/// let result = rewriter.apply(File::create("Castle.Core.rewritten.nupkg")?)?;
/// println!("Copied {} entries", result.entries_copied);
/// # Ok::<(), nupin::Error>(())
/// ```
pub struct ArchiveRewriter<R: Read + Seek> {
    archive: ZipArchive<R>,
    replacements: HashMap<String, Vec<u8>>,
}

impl<R: Read + Seek> ArchiveRewriter<R> {
    /// Opens a zip archive for rewriting.
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
            replacements: HashMap::new(),
        })
    }

    /// Returns the number of pending replacements.
    pub fn pending_replacements(&self) -> usize {
        self.replacements.len()
    }

    /// Queues new content for an existing entry.
    ///
    /// The entry keeps its name and position and is stored deflated.
    pub fn replace(&mut self, name: &str, data: impl Into<Vec<u8>>) -> Result<()> {
        if !self.archive.file_names().any(|existing| existing == name) {
            return Err(Error::EntryNotFound {
                path: name.to_string(),
            });
        }

        self.replacements.insert(name.to_string(), data.into());
        Ok(())
    }

    /// Applies the pending replacements and writes the new archive.
    pub fn apply<W: Write + Seek>(mut self, output: W) -> Result<RewriteResult> {
        let mut result = RewriteResult::default();
        let mut writer = ZipWriter::new(output);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for index in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(index)?;

            if let Some(data) = self.replacements.get(entry.name()) {
                writer.start_file(entry.name(), options)?;
                writer.write_all(data)?;
                result.entries_replaced += 1;
                result.bytes_replaced += data.len() as u64;
                continue;
            }

            result.bytes_copied += entry.compressed_size();
            writer.raw_copy_file(entry)?;
            result.entries_copied += 1;
        }

        writer.finish()?;
        Ok(result)
    }
}

/// Writes `archive` to `output` with the entry `entry_name` replaced by
/// `content`.
///
/// Returns [`Error::EntryNotFound`] if the archive has no such entry.
pub fn rewrite_archive_to<R, W>(
    archive: R,
    entry_name: &str,
    content: &str,
    output: W,
) -> Result<RewriteResult>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let mut rewriter = ArchiveRewriter::new(archive)?;
    rewriter.replace(entry_name, content.as_bytes())?;
    rewriter.apply(output)
}
