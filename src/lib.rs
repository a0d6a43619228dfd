//! Image Downloader Core Library
//!
//! Reads a plaintext list of image URLs and downloads them in parallel with a
//! per-URL timeout, a fixed worker bound, and a skip-or-overwrite policy for
//! files that already exist.
//!
//! # Architecture
//!
//! - [`config`] - Immutable run configuration and its validation
//! - [`parser`] - URL list reading and line parsing
//! - [`download`] - HTTP fetch, atomic file writes, and the fetch orchestrator
//! - [`report`] - JSON report of per-URL results

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod parser;
pub mod report;
mod user_agent;

// Re-export commonly used types
pub use config::{
    ConfigError, DEFAULT_DEST_DIR, DEFAULT_PARALLEL, DEFAULT_TIMEOUT_SECS, DuplicatePolicy,
    RunConfig,
};
pub use download::{
    DownloadError, DownloadOutcome, DownloadResult, FailureKind, FetchOrchestrator, HttpClient,
    RunReport, RunSummary, SkipReason,
};
pub use parser::{InputError, UrlEntry, parse_url_list, read_url_list};
pub use report::{ReportError, render_json_report, write_json_report};
