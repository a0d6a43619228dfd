//! Error types for the download module.
//!
//! Every per-URL failure is one of these variants. They never escape a worker;
//! the orchestrator turns them into `Failed` results.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while fetching and saving a single URL.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The URL does not parse or does not use http/https.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The rejected URL string.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete within the configured timeout.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response content type is not `image/*`.
    #[error("content of {url} is not an image (content-type: {content_type})")]
    NotAnImage {
        /// The URL that returned non-image content.
        url: String,
        /// The reported content type, or `<missing>`.
        content_type: String,
    },

    /// File system error while writing the download.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The worker task ended without producing a result (panic or cancellation).
    #[error("download task for {url} aborted: {reason}")]
    TaskAborted {
        /// The URL the task was processing.
        url: String,
        /// Description of the join failure.
        reason: String,
    },
}

/// Coarse classification of a [`DownloadError`] for summaries and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection or transport failure.
    Network,
    /// Per-URL timeout elapsed.
    Timeout,
    /// Non-success HTTP status.
    Http,
    /// Response was not image content.
    Content,
    /// Writing to disk failed.
    Write,
    /// URL could not be used.
    InvalidUrl,
    /// Worker task failed unexpectedly.
    Internal,
}

impl DownloadError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Maps a reqwest error to [`Timeout`](Self::Timeout) or [`Network`](Self::Network).
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::network(url, source)
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a non-image content error.
    pub fn not_an_image(url: impl Into<String>, content_type: Option<&str>) -> Self {
        Self::NotAnImage {
            url: url.into(),
            content_type: content_type.unwrap_or("<missing>").to_string(),
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an aborted-task error.
    pub fn task_aborted(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TaskAborted {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Classifies this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidUrl { .. } => FailureKind::InvalidUrl,
            Self::Network { .. } => FailureKind::Network,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::HttpStatus { .. } => FailureKind::Http,
            Self::NotAnImage { .. } => FailureKind::Content,
            Self::Io { .. } => FailureKind::Write,
            Self::TaskAborted { .. } => FailureKind::Internal,
        }
    }
}

// No From<reqwest::Error> / From<std::io::Error>: every variant needs the URL
// or path, which the source errors do not carry.
