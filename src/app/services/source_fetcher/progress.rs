//! Progress reporting for daily report downloads

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Optional progress bar over the days being fetched
pub struct DownloadProgress {
    progress_bar: Option<ProgressBar>,
}

impl DownloadProgress {
    /// A progress bar over `total_days`, or a silent reporter when `enabled` is false
    pub fn new(total_days: usize, enabled: bool) -> Self {
        if !enabled {
            return Self { progress_bar: None };
        }

        let pb = ProgressBar::new(total_days as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} daily reports | {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        pb.set_message("Fetching daily reports");
        debug!("Progress bar initialized for {} days", total_days);

        Self {
            progress_bar: Some(pb),
        }
    }

    /// Mark one day done
    pub fn advance(&self, label: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(label.to_string());
            pb.inc(1);
        }
    }

    pub fn finish(&self, fetched: usize) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(format!("Fetched {} daily reports", fetched));
        }
    }

    /// Clear the bar after a failure so the error message stays readable
    pub fn abandon(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.abandon();
        }
    }
}
