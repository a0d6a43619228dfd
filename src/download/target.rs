//! Output file handling with the duplicate policy applied atomically.
//!
//! Every body is streamed into a private staging file next to the target, so
//! a partial download is never visible under the real name. On commit, skip
//! mode publishes the staging file with a hard link, which fails if the name
//! already exists, so exactly one writer wins a given name. Overwrite mode
//! renames the staging file into place and the last writer wins.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs::{File, OpenOptions};
use tracing::debug;

use super::error::DownloadError;
use crate::config::DuplicatePolicy;

/// Counter that keeps staging file names unique within the process.
static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// An open staging file waiting for the response body.
#[derive(Debug)]
pub(crate) struct TargetFile {
    file: File,
    /// Where the body is being written.
    staging_path: PathBuf,
    /// Where the file ends up after [`commit`](Self::commit).
    final_path: PathBuf,
    policy: DuplicatePolicy,
}

/// Result of publishing a staging file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Committed {
    /// The file now lives at this path.
    Saved(PathBuf),
    /// Skip policy and the name was taken by the time the body was complete.
    Duplicate,
}

/// Opens a staging file for `path` under `policy`.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] when the staging file cannot be created.
pub(crate) async fn open_target(
    path: &Path,
    policy: DuplicatePolicy,
) -> Result<TargetFile, DownloadError> {
    let staging_path = staging_path(path);
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&staging_path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    Ok(TargetFile {
        file,
        staging_path,
        final_path: path.to_path_buf(),
        policy,
    })
}

impl TargetFile {
    /// The file to stream the body into.
    pub(crate) fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    /// Path reported in write errors.
    pub(crate) fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Syncs the staging file and publishes it under the final name.
    ///
    /// The staging file is gone afterwards, whatever the result.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Io`] if syncing or publishing fails.
    pub(crate) async fn commit(self) -> Result<Committed, DownloadError> {
        let Self {
            file,
            staging_path,
            final_path,
            policy,
        } = self;

        let synced = file.sync_all().await;
        drop(file);
        if let Err(e) = synced {
            remove_quietly(&staging_path).await;
            return Err(DownloadError::io(&final_path, e));
        }

        match policy {
            DuplicatePolicy::Overwrite => {
                if let Err(e) = tokio::fs::rename(&staging_path, &final_path).await {
                    remove_quietly(&staging_path).await;
                    return Err(DownloadError::io(&final_path, e));
                }
                Ok(Committed::Saved(final_path))
            }
            DuplicatePolicy::Skip => {
                let linked = tokio::fs::hard_link(&staging_path, &final_path).await;
                remove_quietly(&staging_path).await;
                match linked {
                    Ok(()) => Ok(Committed::Saved(final_path)),
                    Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                        debug!(path = %final_path.display(), "name taken while downloading");
                        Ok(Committed::Duplicate)
                    }
                    Err(e) => Err(DownloadError::io(&final_path, e)),
                }
            }
        }
    }

    /// Drops the file and removes whatever was written.
    pub(crate) async fn discard(self) {
        let Self {
            file, staging_path, ..
        } = self;
        drop(file);
        debug!(path = %staging_path.display(), "cleaning up partial file after error");
        remove_quietly(&staging_path).await;
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        debug!(path = %path.display(), error = %e, "could not remove staging file");
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = STAGING_COUNTER.fetch_add(1, Ordering::Relaxed);
    let staged = format!(".{name}.{}.{seq}.part", std::process::id());
    path.with_file_name(staged)
}
