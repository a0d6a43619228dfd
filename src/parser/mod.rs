//! Input parsing for the URL list.
//!
//! The list is plain text with one URL per line. Surrounding whitespace is
//! trimmed and blank lines are ignored; every other line becomes a
//! [`UrlEntry`], including lines that are not valid URLs (those fail later,
//! per URL, instead of aborting the run).
//!
//! # Example
//!
//! ```
//! use image_downloader_core::parser::parse_url_list;
//!
//! let entries = parse_url_list("http://a/x.jpg\n\n  http://a/y.png  \n");
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[1].filename, "y.png");
//! assert_eq!(entries[1].line, 3);
//! ```

mod error;
mod input;

pub use error::InputError;
pub use input::UrlEntry;

use std::path::Path;

use tracing::{debug, info, instrument};

/// Parses the text of a URL list into entries.
#[must_use]
pub fn parse_url_list(text: &str) -> Vec<UrlEntry> {
    let entries: Vec<UrlEntry> = text
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            (!trimmed.is_empty()).then(|| UrlEntry::new(index + 1, trimmed))
        })
        .collect();
    debug!(entries = entries.len(), "parsed URL list");
    entries
}

/// Reads and parses the URL list at `path`.
///
/// # Errors
///
/// Returns [`InputError::NotFound`] if the file does not exist and
/// [`InputError::Unreadable`] for any other read failure, including
/// non-UTF-8 content.
#[instrument(fields(path = %path.display()))]
pub async fn read_url_list(path: &Path) -> Result<Vec<UrlEntry>, InputError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| InputError::from_io(path, e))?;
    let entries = parse_url_list(&text);
    info!(urls = entries.len(), "loaded URL list");
    Ok(entries)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_url_list_skips_blank_lines_and_trims() {
        let entries = parse_url_list("\n  http://a/x.jpg \r\n\t\nhttp://b/y.png\n   \n");
        let urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["http://a/x.jpg", "http://b/y.png"]);
        assert_eq!(entries[0].line, 2);
        assert_eq!(entries[1].line, 4);
    }

    #[test]
    fn test_parse_url_list_keeps_duplicates_and_invalid_lines() {
        let entries = parse_url_list("http://a/x.jpg\nhttp://a/x.jpg\nnot a url\n");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].filename, entries[1].filename);
        assert_eq!(entries[2].url, "not a url");
    }

    #[test]
    fn test_parse_url_list_empty_input() {
        assert!(parse_url_list("").is_empty());
        assert!(parse_url_list("\n\n   \n").is_empty());
    }

    #[tokio::test]
    async fn test_read_url_list_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(&path, "http://a/x.jpg\n\nhttp://a/y.jpg\n").unwrap();

        let entries = read_url_list(&path).await.unwrap();

        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_read_url_list_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = read_url_list(&dir.path().join("nope.txt")).await;
        assert!(matches!(result, Err(InputError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_read_url_list_directory_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let result = read_url_list(dir.path()).await;
        assert!(matches!(result, Err(InputError::Unreadable { .. })));
    }

    #[tokio::test]
    async fn test_read_url_list_non_utf8_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let result = read_url_list(&path).await;

        assert!(matches!(result, Err(InputError::Unreadable { .. })));
    }
}
