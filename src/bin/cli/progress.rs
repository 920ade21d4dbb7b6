//! Progress bar implementation for CLI operations.

use indicatif::{ProgressBar, ProgressStyle};
use nupin::ArchiveReport;
use nupin::progress::ProgressReporter;
use std::path::Path;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} packages {wide_msg}";

/// Progress display for a batch run
pub struct CliProgress {
    bar: ProgressBar,
    quiet: bool,
}

impl CliProgress {
    /// Creates a hidden progress display; the length is set by `on_total`
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        };

        Self { bar, quiet }
    }

    /// Finishes the progress display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Finishes with a custom message
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.bar.abandon_with_message(msg.into());
    }
}

impl ProgressReporter for CliProgress {
    fn on_total(&mut self, total_archives: usize) {
        self.bar.set_length(total_archives as u64);
    }

    fn on_archive_start(&mut self, path: &Path) {
        if self.quiet {
            return;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        // Truncate long names
        let len = name.chars().count();
        let display_name = if len > 40 {
            let tail: String = name.chars().skip(len - 37).collect();
            format!("...{}", tail)
        } else {
            name
        };
        self.bar.set_message(display_name);
    }

    fn on_archive_complete(&mut self, _report: &ArchiveReport) {
        self.bar.inc(1);
    }

    fn on_warning(&mut self, message: &str) {
        if !self.quiet {
            self.bar.suspend(|| eprintln!("Warning: {}", message));
        }
    }
}
