//! Fetch orchestrator: bounded-parallel download of a URL list.
//!
//! A semaphore with `max_parallel_workers` permits caps how many downloads
//! exist at once: a permit is taken before an entry's task is spawned, so at
//! most that many tasks are alive. Finished tasks send their
//! [`DownloadResult`] over a channel to a single collector, which also
//! synthesizes a `Failed` result for any task that panicked, so a run always
//! yields one result per input entry.
//!
//! # Example
//!
//! ```no_run
//! use image_downloader_core::config::RunConfig;
//! use image_downloader_core::download::{FetchOrchestrator, HttpClient};
//! use image_downloader_core::parser::parse_url_list;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::new("./images", 5.0, 4, false)?;
//! let client = HttpClient::new(config.timeout())?;
//! let orchestrator = FetchOrchestrator::new(config, client);
//! let report = orchestrator
//!     .run(parse_url_list("https://example.com/cat.jpg"))
//!     .await;
//! println!("{}", report.summary);
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, instrument, warn};

use super::client::{HttpClient, SaveOutcome};
use super::error::DownloadError;
use super::result::{DownloadOutcome, DownloadResult, RunReport, SkipReason};
use crate::config::RunConfig;
use crate::parser::UrlEntry;

/// Coordinates one download run.
///
/// # Concurrency Model
///
/// - Each URL runs in its own Tokio task
/// - A semaphore permit is held for the whole fetch-then-write sequence
/// - Permits are released when the task finishes (RAII)
/// - A slow or failing URL only holds its own permit
#[derive(Debug)]
pub struct FetchOrchestrator {
    config: Arc<RunConfig>,
    client: HttpClient,
    semaphore: Arc<Semaphore>,
}

impl FetchOrchestrator {
    /// Creates an orchestrator for `config`, sharing `client` across workers.
    #[must_use]
    pub fn new(config: RunConfig, client: HttpClient) -> Self {
        debug!(
            parallel = config.max_parallel_workers(),
            timeout_ms = config.timeout().as_millis(),
            overwrite = config.overwrite_duplicates(),
            dest = %config.dest_dir().display(),
            "creating fetch orchestrator"
        );
        let semaphore = Arc::new(Semaphore::new(config.max_parallel_workers()));
        Self {
            config: Arc::new(config),
            client,
            semaphore,
        }
    }

    /// The configuration this orchestrator runs with.
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Downloads every entry and returns the sorted report.
    ///
    /// Individual failures never abort the run; they appear as `Failed`
    /// results.
    pub async fn run(&self, entries: Vec<UrlEntry>) -> RunReport {
        self.run_with_observer(entries, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `observer` as each result arrives.
    ///
    /// Results arrive in completion order; the returned report is sorted by
    /// input line.
    #[instrument(skip(self, entries, observer), fields(urls = entries.len(), dest = %self.config.dest_dir().display()))]
    pub async fn run_with_observer<F>(&self, entries: Vec<UrlEntry>, mut observer: F) -> RunReport
    where
        F: FnMut(&DownloadResult),
    {
        ensure_dest_dir(&self.config).await;

        let total = entries.len();
        info!(total, "starting downloads");

        let (tx, mut rx) = mpsc::unbounded_channel::<DownloadResult>();

        // Dispatch and collection run side by side so results are observed
        // while later entries still wait for a worker.
        let dispatch = async {
            let mut handles = Vec::with_capacity(total);
            for entry in entries {
                // Blocks while all workers are busy
                let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        let _ = tx.send(DownloadResult {
                            line: entry.line,
                            outcome: DownloadOutcome::Failed(DownloadError::task_aborted(
                                &entry.url,
                                "worker pool closed",
                            )),
                            url: entry.url,
                        });
                        continue;
                    }
                };

                let line = entry.line;
                let url = entry.url.clone();
                let tx = tx.clone();
                let client = self.client.clone();
                let config = Arc::clone(&self.config);

                let handle = tokio::spawn(async move {
                    // Permit is released when the task ends
                    let _permit = permit;
                    let outcome = fetch_one(&client, &config, &entry).await;
                    // Receiver outlives every sender.
                    let _ = tx.send(DownloadResult {
                        line: entry.line,
                        url: entry.url,
                        outcome,
                    });
                });
                handles.push((line, url, handle));
            }
            drop(tx);
            handles
        };

        let collect = async {
            let mut results = Vec::with_capacity(total);
            let mut reported = HashSet::with_capacity(total);
            while let Some(result) = rx.recv().await {
                observer(&result);
                reported.insert(result.line);
                results.push(result);
            }
            (results, reported)
        };

        let (handles, (mut results, reported)) = tokio::join!(dispatch, collect);

        for (line, url, handle) in handles {
            if let Err(e) = handle.await
                && !reported.contains(&line)
            {
                warn!(url = %url, error = %e, "download task panicked");
                let result = DownloadResult {
                    line,
                    outcome: DownloadOutcome::Failed(DownloadError::task_aborted(&url, e.to_string())),
                    url,
                };
                observer(&result);
                results.push(result);
            }
        }

        let report = RunReport::from_results(results);
        info!(
            saved = report.summary.saved,
            skipped = report.summary.skipped,
            failed = report.summary.failed,
            total = report.summary.total(),
            "downloads complete"
        );
        report
    }
}

async fn ensure_dest_dir(config: &RunConfig) {
    let dir = config.dest_dir();
    if tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return;
    }
    match tokio::fs::create_dir_all(dir).await {
        Ok(()) => info!(path = %dir.display(), "created destination directory"),
        // Writes will fail per URL and be reported there.
        Err(e) => warn!(path = %dir.display(), error = %e, "could not create destination directory"),
    }
}

/// Fetches one entry and converts every error into a result.
#[instrument(skip(client, config, entry), fields(line = entry.line, url = %entry.url))]
async fn fetch_one(client: &HttpClient, config: &RunConfig, entry: &UrlEntry) -> DownloadOutcome {
    let target = config.dest_dir().join(&entry.filename);

    match client
        .download(
            &entry.url,
            &target,
            config.duplicate_policy(),
            config.require_image_content(),
        )
        .await
    {
        Ok(SaveOutcome::Saved { path, bytes }) => DownloadOutcome::Saved { path, bytes },
        Ok(SaveOutcome::Duplicate { path }) => {
            info!(path = %path.display(), "file already exists, skipping");
            DownloadOutcome::Skipped(SkipReason::Duplicate { path })
        }
        Err(e) => {
            warn!(error = %e, kind = ?e.kind(), "download failed");
            DownloadOutcome::Failed(e)
        }
    }
}
