//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use image_downloader_core::{DEFAULT_DEST_DIR, DEFAULT_PARALLEL, DEFAULT_TIMEOUT_SECS};

/// Download images from a list of URLs in parallel.
///
/// Reads one URL per line, saves each image under the name at the end of its
/// URL path, and prints a summary of saved, skipped, and failed URLs.
#[derive(Parser, Debug)]
#[command(name = "image-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// File with image URLs, one per line ('-' reads from stdin)
    pub url_file: PathBuf,

    /// Destination folder for downloaded images (created if missing)
    #[arg(short = 'd', long, default_value = DEFAULT_DEST_DIR)]
    pub dest: PathBuf,

    /// Timeout for a single URL request in seconds
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = parse_timeout)]
    pub timeout: f64,

    /// Number of parallel downloads (1-100)
    #[arg(short = 'p', long, default_value_t = DEFAULT_PARALLEL as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub parallel: u8,

    /// Overwrite existing files in the destination folder (skipped by default)
    #[arg(long, visible_alias = "replace-duplicates", alias = "replace_duplicates")]
    pub overwrite: bool,

    /// Save responses even when their Content-Type is not image/*
    #[arg(long)]
    pub any_content_type: bool,

    /// Write a JSON report of every URL's outcome to FILE
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Whether the URL list comes from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.url_file.as_os_str() == "-"
    }
}

/// Log level used when `RUST_LOG` is not set.
pub fn default_log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn parse_timeout(value: &str) -> Result<f64, String> {
    let secs: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number of seconds"))?;
    if secs.is_finite() && secs > 0.0 {
        Ok(secs)
    } else {
        Err(format!("timeout must be greater than 0 (got {value})"))
    }
}
