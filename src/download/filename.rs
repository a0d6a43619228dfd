//! Filename derivation and sanitization for downloaded images.
//!
//! The target name depends only on the URL, so two entries with the same URL
//! always map to the same file and duplicate detection is deterministic.

use std::path::{Component, Path};

use sha2::{Digest, Sha256};
use tracing::debug;
use url::Url;

/// Longest derived name (in bytes) kept before switching to the hashed fallback.
const MAX_FILENAME_BYTES: usize = 200;

/// Hex characters of the URL digest used in fallback names.
const FALLBACK_HASH_CHARS: usize = 16;

/// Derives the on-disk filename for a URL.
///
/// Uses the percent-decoded last path segment (query and fragment are never
/// part of it). Falls back to `image_<sha256 prefix>` when the URL does not
/// parse, the segment is empty, or the sanitized name is unusable.
#[must_use]
pub fn derive_filename(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return fallback_filename(url);
    };

    let Some(last) = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
    else {
        return fallback_filename(url);
    };

    let decoded = urlencoding::decode(last).map_or_else(
        |e| {
            debug!(segment = %last, error = %e, "URL decoding failed, using raw segment");
            last.to_string()
        },
        std::borrow::Cow::into_owned,
    );

    let sanitized = sanitize_filename(&decoded);
    if sanitized.trim_matches('_').is_empty() || sanitized.len() > MAX_FILENAME_BYTES {
        return fallback_filename(url);
    }
    sanitized
}

/// Deterministic fallback name derived from the SHA-256 of the URL.
#[must_use]
pub fn fallback_filename(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let hex: String = digest
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>()
        .chars()
        .take(FALLBACK_HASH_CHARS)
        .collect();
    format!("image_{hex}")
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
