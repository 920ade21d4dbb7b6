//! # nupin
//!
//! Pins NuGet package dependencies to exact versions, in place.
//!
//! Packages (`.nupkg`) are zip archives carrying an XML manifest (`.nuspec`).
//! Each `<dependency id=".." version=".."/>` element whose id starts with a
//! given prefix has its version rewritten to the exact-match range form
//! `[version]`. Every other entry of the package is copied byte-for-byte.
//!
//! ## Quick Start
//!
//! ### Pinning a Directory
//!
//! ```rust,no_run
//! use nupin::{PinOptions, Result, pin_directory};
//!
//! fn main() -> Result<()> {
//!     let report = pin_directory("./artifacts", &PinOptions::new("castle."))?;
//!     for archive in &report.archives {
//!         for dep in &archive.pinned {
//!             println!("{}: {} {} -> {}", archive.path.display(), dep.id, dep.from, dep.to);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Working Stage by Stage
//!
//! The scan, transform and rewrite stages are usable on their own:
//!
//! ```rust,no_run
//! use nupin::{ManifestPinner, Result, ScanOptions, rewrite_archive, scan};
//!
//! fn main() -> Result<()> {
//!     let manifests = scan("./artifacts", &ScanOptions::default())?;
//!     let pinner = ManifestPinner::new("castle.").indent("    ");
//!     for manifest in &manifests {
//!         let outcome = pinner.pin(manifest)?;
//!         if outcome.changed() {
//!             rewrite_archive(&outcome.manifest)?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Matching Rules
//!
//! - Elements are selected by qualified name, compared case-insensitively
//!   with `dependency`.
//! - The `id` attribute is lower-cased and must start with the filter. The
//!   filter itself is used as given, so it should be written in lower case.
//! - A version that already starts with `[` or ends with `]` is left alone.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. A batch stops at the first error, and
//! since every manifest is transformed before any package is written, a
//! malformed manifest leaves the whole directory untouched.
//!
//! ```rust,no_run
//! use nupin::{Error, PinOptions, pin_directory};
//!
//! match pin_directory("./artifacts", &PinOptions::new("castle.")) {
//!     Ok(report) => println!("{} pinned", report.dependencies_pinned()),
//!     Err(Error::MissingAttribute { path, location, attribute, .. }) => {
//!         eprintln!("{}: {} has no {}", path.display(), location, attribute);
//!     }
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | Command-line interface tool |
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod batch;
pub mod error;
pub mod manifest;
pub mod pin;
pub mod progress;
pub mod rewrite;
pub mod scan;

pub use error::{Error, Result};

pub use manifest::{DEFAULT_ARCHIVE_EXTENSION, DEFAULT_MANIFEST_EXTENSION, ManifestEntry};

pub use scan::{ScanOptions, read_manifest, scan};

pub use pin::{IdFilter, ManifestPinner, PinnedDependency, TransformOutcome, pin_version};

pub use rewrite::{RewriteResult, rewrite_archive};

pub use batch::{ArchiveReport, BatchReport, PinOptions, pin_directory, pin_directory_with_progress};

pub use progress::{NoProgress, ProgressReporter, StatisticsProgress, progress_fn};
