//! Error types for reading the URL list.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the input list.
///
/// Both variants are fatal: the run stops before any download starts.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input file does not exist.
    #[error("input file not found: {path}\n  Suggestion: Check the path or pass '-' to read URLs from stdin")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The input exists but could not be read (permissions, not UTF-8, a directory, ...).
    #[error("could not read input {path}: {source}")]
    Unreadable {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    /// Maps an IO error from reading `path` to the matching variant.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Unreadable { path, source }
        }
    }
}
