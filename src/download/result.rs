//! Per-URL results and the run summary.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::error::DownloadError;

/// Why a URL was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The target file already existed and overwriting is off.
    Duplicate {
        /// The existing file.
        path: PathBuf,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { path } => write!(f, "duplicate of {}", path.display()),
        }
    }
}

/// Final state of one URL.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Image written to disk.
    Saved {
        /// Final file path.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// Policy decided not to write.
    Skipped(SkipReason),
    /// Fetch or write failed.
    Failed(DownloadError),
}

impl DownloadOutcome {
    /// Returns `true` for [`Saved`](Self::Saved).
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    /// Returns `true` for [`Skipped`](Self::Skipped).
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Returns `true` for [`Failed`](Self::Failed).
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// The outcome for one input line.
#[derive(Debug)]
pub struct DownloadResult {
    /// 1-based line number in the input list.
    pub line: usize,
    /// The URL as read from input.
    pub url: String,
    /// What happened.
    pub outcome: DownloadOutcome,
}

/// Counts of each outcome for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Images written.
    pub saved: usize,
    /// URLs skipped as duplicates.
    pub skipped: usize,
    /// URLs that failed.
    pub failed: usize,
}

impl RunSummary {
    /// Adds one result to the counts.
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Saved { .. } => self.saved += 1,
            DownloadOutcome::Skipped(_) => self.skipped += 1,
            DownloadOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Total number of results counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.saved + self.skipped + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Saved: {}, Skipped: {}, Failed: {}",
            self.saved, self.skipped, self.failed
        )
    }
}

/// Everything a run produced, ordered by input line.
#[derive(Debug, Default)]
pub struct RunReport {
    /// One result per input URL.
    pub results: Vec<DownloadResult>,
    /// Outcome counts.
    pub summary: RunSummary,
}

impl RunReport {
    /// Builds a report, sorting results by input line.
    #[must_use]
    pub fn from_results(mut results: Vec<DownloadResult>) -> Self {
        results.sort_by_key(|r| r.line);
        let mut summary = RunSummary::default();
        for result in &results {
            summary.record(&result.outcome);
        }
        Self { results, summary }
    }
}
