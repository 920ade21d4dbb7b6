//! Shared test utilities for integration tests.
//!
//! Package creation helpers are consolidated here to avoid duplication.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Binary payload that looks like a small assembly.
pub const DLL_BYTES: &[u8] = b"MZ\x90\x00\x03\x00\x00\x00\x04\x00\x00\x00\xff\xff\x00\x00";

/// One entry of a test package.
pub struct TestEntry<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
    pub method: CompressionMethod,
}

impl<'a> TestEntry<'a> {
    /// A deflated entry.
    pub fn deflated(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            data,
            method: CompressionMethod::Deflated,
        }
    }

    /// A stored (uncompressed) entry.
    pub fn stored(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            data,
            method: CompressionMethod::Stored,
        }
    }
}

/// Builds a zip archive in memory.
pub fn create_zip(entries: &[TestEntry<'_>]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        let options = SimpleFileOptions::default().compression_method(entry.method);
        zip.start_file(entry.name, options)
            .expect("Failed to start zip entry");
        zip.write_all(entry.data).expect("Failed to write zip entry");
    }
    zip.finish().expect("Failed to finish zip").into_inner()
}

/// Writes a package with the usual layout: the manifest, a content-types
/// file, an assembly and a stored readme.
pub fn write_package(dir: &Path, name: &str, nuspec: &str) -> PathBuf {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .expect("Package name has no stem");
    let nuspec_name = format!("{}.nuspec", stem);
    write_zip(
        dir,
        name,
        &[
            TestEntry::deflated("_rels/.rels", b"<Relationships/>"),
            TestEntry::deflated(&nuspec_name, nuspec.as_bytes()),
            TestEntry::deflated("lib/net8.0/Lib.dll", DLL_BYTES),
            TestEntry::stored("readme.md", b"# Readme\n"),
            TestEntry::deflated("[Content_Types].xml", b"<Types/>"),
        ],
    )
}

/// Writes a zip with arbitrary entries to `dir/name`.
pub fn write_zip(dir: &Path, name: &str, entries: &[TestEntry<'_>]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create package directory");
    }
    std::fs::write(&path, create_zip(entries)).expect("Failed to write package");
    path
}

/// A nuspec with the given `(id, version)` dependencies.
pub fn nuspec(id: &str, dependencies: &[(&str, &str)]) -> String {
    let mut deps = String::new();
    for (dep_id, version) in dependencies {
        deps.push_str(&format!(
            "      <dependency id=\"{}\" version=\"{}\" />\n",
            dep_id, version
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <package>\n  \
           <metadata>\n    \
             <id>{}</id>\n    \
             <version>1.0.0</version>\n    \
             <dependencies>\n{}    </dependencies>\n  \
           </metadata>\n\
         </package>\n",
        id, deps
    )
}

/// Reads the content of the named entry of a package on disk.
pub fn read_entry(path: &Path, name: &str) -> String {
    let mut archive = ZipArchive::new(File::open(path).expect("Failed to open package"))
        .expect("Failed to read package");
    let mut entry = archive.by_name(name).expect("Entry missing");
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .expect("Entry is not UTF-8");
    content
}

/// Raw view of one zip entry: name, method, CRC and compressed bytes.
#[derive(Debug, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub method: CompressionMethod,
    pub crc32: u32,
    pub compressed: Vec<u8>,
}

/// Lists every entry of a package with its raw compressed bytes.
pub fn raw_entries(path: &Path) -> Vec<RawEntry> {
    let mut archive = ZipArchive::new(File::open(path).expect("Failed to open package"))
        .expect("Failed to read package");
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index_raw(i).expect("Failed to read entry");
            let mut compressed = Vec::new();
            entry
                .read_to_end(&mut compressed)
                .expect("Failed to read raw entry");
            RawEntry {
                name: entry.name().to_string(),
                method: entry.compression(),
                crc32: entry.crc32(),
                compressed,
            }
        })
        .collect()
}

/// Returns the `version` attribute of the dependency with the given id.
pub fn dependency_version(nuspec: &str, id: &str) -> Option<String> {
    let root = xmltree::Element::parse(nuspec.as_bytes()).expect("Manifest is not XML");
    let deps = root.get_child("metadata")?.get_child("dependencies")?;
    deps.children
        .iter()
        .filter_map(|node| node.as_element())
        .find(|e| e.attributes.get("id").map(String::as_str) == Some(id))
        .and_then(|e| e.attributes.get("version").cloned())
}
