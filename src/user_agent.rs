//! User-Agent string sent with every image request.

/// Default User-Agent for image requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("image-downloader/{version}")
}
