//! Progress reporting for batch operations.
//!
//! A batch reports the number of packages it is about to rewrite and then
//! one start/complete pair per package.
//!
//! # Example
//!
//! ```rust,no_run
//! use nupin::progress::progress_fn;
//! use nupin::{PinOptions, pin_directory_with_progress};
//!
//! let mut progress = progress_fn(|report| {
//!     println!("{}: {} pinned", report.path.display(), report.pinned.len());
//! });
//! pin_directory_with_progress("./artifacts", &PinOptions::new("castle."), &mut progress)?;
//! # Ok::<(), nupin::Error>(())
//! ```

use std::path::Path;

use crate::batch::ArchiveReport;

/// Progress reporting trait for batch operations.
pub trait ProgressReporter {
    /// Called once, after scanning, with the number of packages that have a
    /// manifest.
    fn on_total(&mut self, total_archives: usize) {
        let _ = total_archives;
    }

    /// Called before a package is processed.
    fn on_archive_start(&mut self, path: &Path) {
        let _ = path;
    }

    /// Called after a package was processed.
    fn on_archive_complete(&mut self, report: &ArchiveReport) {
        let _ = report;
    }

    /// Called on any warning during processing.
    fn on_warning(&mut self, message: &str) {
        let _ = message;
    }
}

/// A progress reporter that does nothing (null object pattern).
#[derive(Debug, Default, Clone)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// A progress reporter that collects statistics.
#[derive(Debug, Default, Clone)]
pub struct StatisticsProgress {
    /// Packages announced by `on_total`.
    pub total_archives: usize,
    /// Packages completed so far.
    pub archives_processed: usize,
    /// Package currently being processed.
    pub current_archive: Option<String>,
    /// Warnings collected.
    pub warnings: Vec<String>,
}

impl StatisticsProgress {
    /// Creates a new statistics progress reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fraction of packages processed, in percent.
    pub fn percentage(&self) -> f64 {
        if self.total_archives == 0 {
            100.0
        } else {
            (self.archives_processed as f64 / self.total_archives as f64) * 100.0
        }
    }
}

impl ProgressReporter for StatisticsProgress {
    fn on_total(&mut self, total_archives: usize) {
        self.total_archives = total_archives;
    }

    fn on_archive_start(&mut self, path: &Path) {
        self.current_archive = Some(path.display().to_string());
    }

    fn on_archive_complete(&mut self, _report: &ArchiveReport) {
        self.archives_processed += 1;
        self.current_archive = None;
    }

    fn on_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

/// A progress reporter that calls a closure for every completed package.
pub struct ClosureProgress<F> {
    callback: F,
}

impl<F> ClosureProgress<F>
where
    F: FnMut(&ArchiveReport),
{
    /// Creates a progress reporter from a closure.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgress<F>
where
    F: FnMut(&ArchiveReport),
{
    fn on_archive_complete(&mut self, report: &ArchiveReport) {
        (self.callback)(report)
    }
}

/// Creates a closure-based progress reporter.
pub fn progress_fn<F>(f: F) -> ClosureProgress<F>
where
    F: FnMut(&ArchiveReport),
{
    ClosureProgress::new(f)
}
