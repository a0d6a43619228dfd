//! JSON report of a download run.
//!
//! The report lists every input line with its status, so a failed batch can be
//! inspected (or fed back in) without parsing log output.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::download::{DownloadOutcome, DownloadResult, FailureKind, RunReport, RunSummary};

/// Errors that can occur while writing the report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report could not be serialized.
    #[error("could not serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The report file could not be written.
    #[error("could not write report to {path}: {source}")]
    Io {
        /// Report destination.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    summary: RunSummary,
    results: Vec<ReportEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum EntryStatus {
    Saved,
    Skipped,
    Failed,
}

#[derive(Debug, Serialize)]
struct ReportEntry<'a> {
    line: usize,
    url: &'a str,
    status: EntryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl<'a> From<&'a DownloadResult> for ReportEntry<'a> {
    fn from(result: &'a DownloadResult) -> Self {
        let mut entry = ReportEntry {
            line: result.line,
            url: &result.url,
            status: EntryStatus::Saved,
            path: None,
            bytes: None,
            kind: None,
            reason: None,
        };
        match &result.outcome {
            DownloadOutcome::Saved { path, bytes } => {
                entry.path = Some(path.display().to_string());
                entry.bytes = Some(*bytes);
            }
            DownloadOutcome::Skipped(reason) => {
                entry.status = EntryStatus::Skipped;
                entry.reason = Some(reason.to_string());
            }
            DownloadOutcome::Failed(error) => {
                entry.status = EntryStatus::Failed;
                entry.kind = Some(error.kind());
                entry.reason = Some(error.to_string());
            }
        }
        entry
    }
}

/// Renders `report` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ReportError::Serialize`] if serialization fails.
pub fn render_json_report(report: &RunReport) -> Result<String, ReportError> {
    let document = ReportDocument {
        summary: report.summary,
        results: report.results.iter().map(ReportEntry::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Writes `report` as JSON to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ReportError`] if serialization or the write fails.
#[instrument(skip(report), fields(path = %path.display()))]
pub async fn write_json_report(path: &Path, report: &RunReport) -> Result<(), ReportError> {
    let json = render_json_report(report)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    info!(entries = report.results.len(), "wrote run report");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::download::{DownloadError, SkipReason};

    fn sample_report() -> RunReport {
        RunReport::from_results(vec![
            DownloadResult {
                line: 1,
                url: "http://a/x.jpg".to_string(),
                outcome: DownloadOutcome::Saved {
                    path: PathBuf::from("out/x.jpg"),
                    bytes: 42,
                },
            },
            DownloadResult {
                line: 2,
                url: "http://a/x.jpg".to_string(),
                outcome: DownloadOutcome::Skipped(SkipReason::Duplicate {
                    path: PathBuf::from("out/x.jpg"),
                }),
            },
            DownloadResult {
                line: 3,
                url: "http://bad-host/y.jpg".to_string(),
                outcome: DownloadOutcome::Failed(DownloadError::timeout("http://bad-host/y.jpg")),
            },
        ])
    }

    #[test]
    fn test_render_json_report_shape() {
        let json = render_json_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["saved"], 1);
        assert_eq!(value["summary"]["skipped"], 1);
        assert_eq!(value["summary"]["failed"], 1);

        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["status"], "saved");
        assert_eq!(results[0]["bytes"], 42);
        assert!(results[0].get("kind").is_none());
        assert_eq!(results[1]["status"], "skipped");
        assert_eq!(results[2]["status"], "failed");
        assert_eq!(results[2]["kind"], "timeout");
    }

    #[tokio::test]
    async fn test_write_json_report_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        write_json_report(&path, &sample_report()).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"summary\""));
    }

    #[tokio::test]
    async fn test_write_json_report_bad_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.json");

        let result = write_json_report(&path, &sample_report()).await;

        assert!(matches!(result, Err(ReportError::Io { .. })));
    }
}
