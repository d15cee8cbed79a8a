//! Streaming archive download.

use std::path::Path;
use std::sync::Arc;

use crate::error::{FetchError, Result};
use crate::http::{HttpTransport, Progress};

/// Streams resolved URLs to local storage.
pub struct ArchiveDownloader {
    transport: Arc<dyn HttpTransport>,
}

impl ArchiveDownloader {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Download `url` to `dest`, reporting progress as bytes arrive.
    ///
    /// The destination is created or truncated. When the transfer fails
    /// midway the partial file is intentionally left on disk; the checksum
    /// pass detects it on the next attempt.
    pub async fn download(&self, url: &str, dest: &Path, progress: Progress<'_>) -> Result<u64> {
        let filename = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string());

        self.transport
            .download(url, dest, progress)
            .await
            .map_err(|e| match e {
                // Local filesystem failures keep their own error kind.
                e @ FetchError::Io(_) => e,
                e => FetchError::DownloadFailed {
                    filename,
                    reason: e.to_string(),
                },
            })
    }
}
