//! Progress bar for download runs.

use std::time::Duration;

use image_downloader_core::{DownloadResult, RunSummary};
use indicatif::{ProgressBar, ProgressStyle};

/// Tracks finished URLs and draws a bar on stderr when enabled.
pub struct ProgressReporter {
    bar: ProgressBar,
    counts: RunSummary,
}

impl ProgressReporter {
    /// Creates a reporter for `total` URLs. A disabled reporter draws nothing.
    pub fn new(total: usize, enabled: bool) -> Self {
        let bar = if enabled {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        Self {
            bar,
            counts: RunSummary::default(),
        }
    }

    /// Records one finished URL.
    pub fn record(&mut self, result: &DownloadResult) {
        self.counts.record(&result.outcome);
        self.bar.inc(1);
        self.bar.set_message(self.counts.to_string());
    }

    /// Counts recorded so far.
    pub fn counts(&self) -> RunSummary {
        self.counts
    }

    /// Clears the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
