//! Command implementations for the CLI tool.

use std::path::Path;

use nupin::{PinOptions, pin_directory_with_progress};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;
use crate::progress::CliProgress;

/// Configuration for the pin command.
pub struct PinConfig<'a> {
    pub directory: &'a Path,
    pub filter: &'a str,
    pub dry_run: bool,
    pub skip_unchanged: bool,
    pub archive_ext: &'a str,
    pub manifest_ext: &'a str,
    pub follow_links: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Pin command implementation
pub fn pin(config: &PinConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let root = match std::env::current_dir() {
        Ok(cwd) => cwd.join(config.directory),
        Err(e) => {
            eprintln!("Error reading current directory: {}", e);
            return ExitCode::IoError;
        }
    };

    if config.filter.chars().any(char::is_uppercase) && !config.quiet {
        eprintln!(
            "Warning: ids are lower-cased before matching, filter '{}' can never match",
            config.filter
        );
    }

    let options = PinOptions::new(config.filter)
        .archive_extension(config.archive_ext)
        .manifest_extension(config.manifest_ext)
        .follow_links(config.follow_links)
        .dry_run(config.dry_run)
        .skip_unchanged(config.skip_unchanged);

    let mut progress = CliProgress::new(config.quiet || config.format == OutputFormat::Json);

    match pin_directory_with_progress(&root, &options, &mut progress) {
        Ok(report) => {
            progress.finish();
            print!("{}", formatter.format_report(&report));
            if config.format == OutputFormat::Json {
                println!();
            }
            ExitCode::Success
        }
        Err(e) => {
            progress.finish_with_message("Failed");
            match config.format {
                OutputFormat::Json => println!("{}", formatter.format_error(&e)),
                OutputFormat::Human => eprint!("{}", formatter.format_error(&e)),
            }
            error_to_exit_code(&e)
        }
    }
}
