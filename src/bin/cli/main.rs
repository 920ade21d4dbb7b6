//! CLI tool for pinning package dependency versions.

mod commands;
mod exit_codes;
mod output;
mod progress;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use nupin::{DEFAULT_ARCHIVE_EXTENSION, DEFAULT_MANIFEST_EXTENSION};

/// Pin NuGet dependency versions inside package archives
#[derive(Parser)]
#[command(name = "nupin")]
#[command(author, version, long_about = None)]
#[command(about = "Pin NuGet dependency versions inside package archives")]
pub struct Cli {
    /// Directory to scan for packages, relative to the current directory
    directory: PathBuf,

    /// Dependency id prefix to pin (compared against lower-cased ids)
    filter: String,

    /// Transform manifests but do not write any package
    #[arg(long)]
    dry_run: bool,

    /// Leave packages with nothing to pin untouched
    #[arg(long)]
    skip_unchanged: bool,

    /// Package file extension
    #[arg(long, default_value = DEFAULT_ARCHIVE_EXTENSION)]
    archive_ext: String,

    /// Manifest entry extension
    #[arg(long, default_value = DEFAULT_MANIFEST_EXTENSION)]
    manifest_ext: String,

    /// Follow symbolic links while scanning
    #[arg(long, short = 'L')]
    follow_links: bool,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() {
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(exit_codes::BAD_ARGS);
        }
        Err(e) => {
            // --help and --version
            let _ = e.print();
            std::process::exit(exit_codes::SUCCESS);
        }
    };

    let exit_code = commands::pin(&commands::PinConfig {
        directory: &cli.directory,
        filter: &cli.filter,
        dry_run: cli.dry_run,
        skip_unchanged: cli.skip_unchanged,
        archive_ext: &cli.archive_ext,
        manifest_ext: &cli.manifest_ext,
        follow_links: cli.follow_links,
        format: cli.format,
        quiet: cli.quiet,
    });

    std::process::exit(exit_code.code());
}
