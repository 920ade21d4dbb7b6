//! Output formatting for CLI operations.

use nupin::{BatchReport, Error};
use serde_json::json;

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats the outcome of a batch run
    fn format_report(&self, report: &BatchReport) -> String;

    /// Formats a batch failure
    fn format_error(&self, error: &Error) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_report(&self, report: &BatchReport) -> String {
        let mut output = String::new();

        for archive in &report.archives {
            if archive.pinned.is_empty() {
                continue;
            }
            output.push_str(&format!("{}\n", archive.path.display()));
            for dep in &archive.pinned {
                output.push_str(&format!("  {}: {} -> {}\n", dep.id, dep.from, dep.to));
            }
        }

        if !output.is_empty() {
            output.push_str(&"-".repeat(70));
            output.push('\n');
        }

        let verb = if report.dry_run {
            "would be pinned"
        } else {
            "pinned"
        };
        output.push_str(&format!(
            "{} dependencies {} in {} packages\n",
            report.dependencies_pinned(),
            verb,
            report.archives.iter().filter(|a| !a.pinned.is_empty()).count()
        ));
        output.push_str(&format!(
            "{} packages found, {} rewritten",
            report.archives_found,
            report.archives_rewritten()
        ));
        if report.archives_without_manifest() > 0 {
            output.push_str(&format!(
                ", {} without manifest",
                report.archives_without_manifest()
            ));
        }
        if report.dry_run {
            output.push_str(" (dry run)");
        }
        output.push('\n');

        output
    }

    fn format_error(&self, error: &Error) -> String {
        format!("Error: {}\n", error)
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &BatchReport) -> String {
        let archives: Vec<_> = report
            .archives
            .iter()
            .map(|a| {
                json!({
                    "path": a.path.display().to_string(),
                    "manifest": a.manifest_entry,
                    "rewritten": a.rewritten,
                    "entries_copied": a.entries_copied,
                    "pinned": a.pinned.iter().map(|d| json!({
                        "id": d.id,
                        "from": d.from,
                        "to": d.to,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        let obj = json!({
            "success": true,
            "root": report.root.display().to_string(),
            "dry_run": report.dry_run,
            "archives_found": report.archives_found,
            "archives_without_manifest": report.archives_without_manifest(),
            "archives_rewritten": report.archives_rewritten(),
            "dependencies_pinned": report.dependencies_pinned(),
            "archives": archives,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_error(&self, error: &Error) -> String {
        let obj = json!({
            "success": false,
            "error": error.to_string(),
            "archive": error.archive_path().map(|p| p.display().to_string()),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}
