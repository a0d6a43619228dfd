//! Bounded-parallel image downloading.
//!
//! This module fetches each URL of a list with a single timeout-bounded
//! request and saves the body under a name derived from the URL.
//!
//! # Features
//!
//! - Streaming writes (the body never has to fit in memory)
//! - Deterministic filenames from the URL path tail, with a hashed fallback
//! - Skip-or-overwrite duplicate policy applied atomically per file
//! - Per-URL failures collected into the report instead of aborting the run
//!
//! # Example
//!
//! ```no_run
//! use image_downloader_core::config::RunConfig;
//! use image_downloader_core::download::{FetchOrchestrator, HttpClient};
//! use image_downloader_core::parser::parse_url_list;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RunConfig::new("./images", 5.0, 10, false)?;
//! let client = HttpClient::new(config.timeout())?;
//! let report = FetchOrchestrator::new(config, client)
//!     .run(parse_url_list("https://example.com/cat.jpg\n"))
//!     .await;
//! println!("{}", report.summary);
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod filename;
mod orchestrator;
mod result;
mod target;

pub use client::{HttpClient, SaveOutcome};
pub use error::{DownloadError, FailureKind};
pub use filename::{derive_filename, fallback_filename};
pub use orchestrator::FetchOrchestrator;
pub use result::{DownloadOutcome, DownloadResult, RunReport, RunSummary, SkipReason};
