//! Types representing one parsed line of the URL list.

use std::fmt;

use crate::download::derive_filename;

/// A single URL from the input list and the file it will be saved as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    /// 1-based line number in the input.
    pub line: usize,
    /// The trimmed URL text.
    pub url: String,
    /// Target filename inside the destination directory.
    pub filename: String,
}

impl UrlEntry {
    /// Creates an entry, deriving its filename from the URL.
    #[must_use]
    pub fn new(line: usize, url: impl Into<String>) -> Self {
        let url = url.into();
        let filename = derive_filename(&url);
        Self {
            line,
            url,
            filename,
        }
    }
}

impl fmt::Display for UrlEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] {} -> {}", self.line, self.url, self.filename)
    }
}
