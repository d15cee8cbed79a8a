//! Progress reporting for downloads.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use nusc_fetch::ProgressCallback;

/// Manages one progress bar per archive download.
pub struct ProgressManager {
    inner: Arc<Inner>,
}

struct Inner {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                multi: MultiProgress::new(),
                bars: Mutex::new(HashMap::new()),
                enabled,
            }),
        }
    }

    /// Callback for `Fetcher::with_progress`; lazily creates a bar the first
    /// time an archive reports progress.
    pub fn download_callback(&self) -> ProgressCallback {
        let inner = Arc::clone(&self.inner);
        Box::new(move |filename, bytes, total| {
            let mut bars = inner.bars.lock().unwrap();
            let bar = bars
                .entry(filename.to_string())
                .or_insert_with(|| inner.create_download_bar(filename, total));
            if let Some(total) = total {
                bar.set_length(total);
            }
            bar.set_position(bytes);
        })
    }

    /// Finish and clear every bar, e.g. before printing the summary.
    pub fn clear(&self) {
        let bars = self.inner.bars.lock().unwrap();
        for bar in bars.values() {
            bar.finish_and_clear();
        }
        let _ = self.inner.multi.clear();
    }
}

impl Inner {
    fn create_download_bar(&self, name: &str, total: Option<u64>) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let bar = match total {
            Some(total) => {
                let bar = self.multi.add(ProgressBar::new(total));
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                        .unwrap()
                        .progress_chars("#>-"),
                );
                bar
            }
            // Unknown total: spinner with a live byte count.
            None => {
                let bar = self.multi.add(ProgressBar::new_spinner());
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {bytes} {msg}")
                        .unwrap(),
                );
                bar
            }
        };
        bar.set_message(name.to_string());
        bar
    }
}
