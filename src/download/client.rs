//! HTTP client wrapper for fetching one image per call.
//!
//! This module provides the `HttpClient` struct, which performs a single
//! timeout-bounded GET, validates the response, and streams the body into a
//! target file under the configured duplicate policy.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::error::DownloadError;
use super::target::{Committed, TargetFile, open_target};
use crate::config::DuplicatePolicy;
use crate::user_agent;

/// What happened to a URL that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Body written to `path`.
    Saved {
        /// Final file path.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// Target already existed and the skip policy applies.
    Duplicate {
        /// The existing file.
        path: PathBuf,
    },
}

/// HTTP client for downloading images with streaming support.
///
/// Created once per run and cloned into every worker; clones share one
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use std::time::Duration;
/// use image_downloader_core::config::DuplicatePolicy;
/// use image_downloader_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new(Duration::from_secs(5))?;
/// let outcome = client
///     .download(
///         "https://example.com/cat.jpg",
///         Path::new("./images/cat.jpg"),
///         DuplicatePolicy::Skip,
///         true,
///     )
///     .await?;
/// println!("{outcome:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client whose every request is bounded by `timeout`.
    ///
    /// The same value caps the connect phase and the whole request, body
    /// included.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the TLS backend or system
    /// configuration cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()?;
        debug!(timeout_ms = timeout.as_millis(), "built HTTP client");
        Ok(Self { client })
    }

    /// Fetches `url` and saves the body at `target`.
    ///
    /// The duplicate check happens at write time, after the response has been
    /// fetched and validated, so an unreachable URL is a failure even when its
    /// target name exists. The body is staged next to the target and only
    /// published once complete. With [`DuplicatePolicy::Skip`] a taken name
    /// yields [`SaveOutcome::Duplicate`]; with [`DuplicatePolicy::Overwrite`]
    /// the target is replaced atomically.
    ///
    /// When `require_image` is set, responses whose `Content-Type` does not
    /// contain `image` are rejected without touching the disk.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid or not http/https
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - The content type is not an image and `require_image` is set
    /// - Writing to disk fails
    #[instrument(skip(self, target), fields(url = %url, target = %target.display()))]
    pub async fn download(
        &self,
        url: &str,
        target: &Path,
        policy: DuplicatePolicy,
        require_image: bool,
    ) -> Result<SaveOutcome, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DownloadError::invalid_url(url));
        }

        let response = self.send_request(parsed, url, require_image).await?;

        let mut file = open_target(target, policy).await?;

        let bytes = match stream_to_file(&mut file, response, url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                file.discard().await;
                return Err(e);
            }
        };

        match file.commit().await? {
            Committed::Saved(path) => {
                info!(path = %path.display(), bytes, "image saved");
                Ok(SaveOutcome::Saved { path, bytes })
            }
            Committed::Duplicate => {
                debug!("target exists at write time, skipping");
                Ok(SaveOutcome::Duplicate {
                    path: target.to_path_buf(),
                })
            }
        }
    }

    async fn send_request(
        &self,
        parsed: Url,
        url: &str,
        require_image: bool,
    ) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }
        debug!(status = status.as_u16(), "response received");

        if require_image {
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            if !is_image_content_type(content_type) {
                return Err(DownloadError::not_an_image(url, content_type));
            }
        }

        Ok(response)
    }
}

/// Whether a `Content-Type` header value names image content.
fn is_image_content_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|value| value.to_ascii_lowercase().contains("image"))
}

/// Streams response body to file, returning bytes written.
///
/// The caller discards the file on error.
async fn stream_to_file(
    target: &mut TargetFile,
    response: reqwest::Response,
    url: &str,
) -> Result<u64, DownloadError> {
    let path = target.final_path().to_path_buf();
    let mut writer = BufWriter::new(target.file_mut());
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_reqwest(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(&path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(&path, e))?;

    Ok(bytes_written)
}
