//! CLI entry point for the image downloader.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;
use image_downloader_core::{
    FetchOrchestrator, HttpClient, RunConfig, UrlEntry, parse_url_list, read_url_list,
    write_json_report,
};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

mod cli;
mod progress;

use cli::Args;
use progress::ProgressReporter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(cli::default_log_level(args.verbose, args.quiet))
    });

    // Logs go to stderr; stdout carries only the summary line.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = RunConfig::new(
        &args.dest,
        args.timeout,
        usize::from(args.parallel),
        args.overwrite,
    )?
    .with_require_image_content(!args.any_content_type);

    // The list is read in full before any request is made.
    let entries = load_entries(&args).await?;
    if entries.is_empty() {
        info!("No URLs found in input");
    }

    let client = HttpClient::new(config.timeout()).context("failed to build HTTP client")?;
    let orchestrator = FetchOrchestrator::new(config, client);

    let show_progress = !args.quiet && std::io::stderr().is_terminal();
    let mut progress = ProgressReporter::new(entries.len(), show_progress);
    let report = orchestrator
        .run_with_observer(entries, |result| progress.record(result))
        .await;
    progress.finish();
    debug!(observed = %progress.counts(), "progress totals");

    if let Some(path) = &args.report {
        // Per-URL outcomes already happened; a report failure does not change the exit code.
        if let Err(e) = write_json_report(path, &report).await {
            warn!(error = %e, "could not write report");
        }
    }

    println!("{}", report.summary);
    Ok(())
}

async fn load_entries(args: &Args) -> Result<Vec<UrlEntry>> {
    if args.reads_stdin() {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("could not read URL list from stdin")?;
        return Ok(parse_url_list(&text));
    }

    let entries = read_url_list(&args.url_file).await?;
    Ok(entries)
}
