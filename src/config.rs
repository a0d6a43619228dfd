//! Run configuration shared by every download worker.
//!
//! A [`RunConfig`] is built once from CLI input, validated, and then handed
//! to the orchestrator behind an `Arc`. Nothing mutates it during a run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Default per-URL timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 5.0;

/// Default number of parallel download workers.
pub const DEFAULT_PARALLEL: usize = 10;

/// Default destination directory for downloaded images.
pub const DEFAULT_DEST_DIR: &str = "image_downloads";

/// Minimum allowed worker count.
const MIN_PARALLEL: usize = 1;

/// Maximum allowed worker count.
const MAX_PARALLEL: usize = 100;

/// Errors raised while validating a [`RunConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Timeout is zero, negative, NaN, or too large to represent.
    #[error("invalid timeout {value}s: must be a positive number of seconds")]
    InvalidTimeout {
        /// The rejected value.
        value: f64,
    },

    /// Worker count outside the supported range.
    #[error(
        "invalid parallelism {value}: must be between {MIN_PARALLEL} and {MAX_PARALLEL}"
    )]
    InvalidParallelism {
        /// The rejected value.
        value: usize,
    },
}

/// What to do when a target file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Leave the existing file alone and report the URL as skipped.
    Skip,
    /// Replace the existing file with the new download.
    Overwrite,
}

/// Immutable settings for one download run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    timeout: Duration,
    max_parallel_workers: usize,
    overwrite_duplicates: bool,
    dest_dir: PathBuf,
    require_image_content: bool,
}

impl RunConfig {
    /// Builds a validated configuration.
    ///
    /// Image content-type checking is on; use
    /// [`with_require_image_content`](Self::with_require_image_content) to change it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] unless `timeout_secs` is a finite
    /// positive number, and [`ConfigError::InvalidParallelism`] unless
    /// `max_parallel_workers` is within 1..=100.
    pub fn new(
        dest_dir: impl Into<PathBuf>,
        timeout_secs: f64,
        max_parallel_workers: usize,
        overwrite_duplicates: bool,
    ) -> Result<Self, ConfigError> {
        if !timeout_secs.is_finite() || timeout_secs <= 0.0 {
            return Err(ConfigError::InvalidTimeout {
                value: timeout_secs,
            });
        }
        let timeout = Duration::try_from_secs_f64(timeout_secs)
            .map_err(|_| ConfigError::InvalidTimeout {
                value: timeout_secs,
            })?;

        if !(MIN_PARALLEL..=MAX_PARALLEL).contains(&max_parallel_workers) {
            return Err(ConfigError::InvalidParallelism {
                value: max_parallel_workers,
            });
        }

        Ok(Self {
            timeout,
            max_parallel_workers,
            overwrite_duplicates,
            dest_dir: dest_dir.into(),
            require_image_content: true,
        })
    }

    /// Returns a copy with the image content-type check switched on or off.
    #[must_use]
    pub fn with_require_image_content(mut self, require: bool) -> Self {
        self.require_image_content = require;
        self
    }

    /// Per-URL timeout covering connect, headers, and body.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Maximum number of downloads in flight at once.
    #[must_use]
    pub fn max_parallel_workers(&self) -> usize {
        self.max_parallel_workers
    }

    /// Whether existing files are replaced.
    #[must_use]
    pub fn overwrite_duplicates(&self) -> bool {
        self.overwrite_duplicates
    }

    /// The duplicate policy implied by [`overwrite_duplicates`](Self::overwrite_duplicates).
    #[must_use]
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.overwrite_duplicates {
            DuplicatePolicy::Overwrite
        } else {
            DuplicatePolicy::Skip
        }
    }

    /// Directory that receives downloaded files.
    #[must_use]
    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /// Whether responses must carry an `image/*` content type.
    #[must_use]
    pub fn require_image_content(&self) -> bool {
        self.require_image_content
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_new_valid_values() {
        let config = RunConfig::new("out", 2.5, 4, true).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.max_parallel_workers(), 4);
        assert!(config.overwrite_duplicates());
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::Overwrite);
        assert_eq!(config.dest_dir(), Path::new("out"));
        assert!(config.require_image_content());
    }

    #[test]
    fn test_run_config_skip_policy_when_not_overwriting() {
        let config = RunConfig::new("out", DEFAULT_TIMEOUT_SECS, DEFAULT_PARALLEL, false).unwrap();
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::Skip);
    }

    #[test]
    fn test_run_config_rejects_non_positive_timeout() {
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = RunConfig::new("out", value, 1, false);
            assert!(
                matches!(result, Err(ConfigError::InvalidTimeout { .. })),
                "timeout {value} should be rejected"
            );
        }
    }

    #[test]
    fn test_run_config_rejects_parallelism_out_of_range() {
        assert!(matches!(
            RunConfig::new("out", 1.0, 0, false),
            Err(ConfigError::InvalidParallelism { value: 0 })
        ));
        assert!(matches!(
            RunConfig::new("out", 1.0, 101, false),
            Err(ConfigError::InvalidParallelism { value: 101 })
        ));
        assert!(RunConfig::new("out", 1.0, 100, false).is_ok());
    }

    #[test]
    fn test_run_config_content_check_toggle() {
        let config = RunConfig::new("out", 1.0, 1, false)
            .unwrap()
            .with_require_image_content(false);
        assert!(!config.require_image_content());
    }

    #[test]
    fn test_config_error_display_mentions_range() {
        let msg = ConfigError::InvalidParallelism { value: 0 }.to_string();
        assert!(msg.contains("invalid parallelism"));
        assert!(msg.contains("100"));
    }
}
