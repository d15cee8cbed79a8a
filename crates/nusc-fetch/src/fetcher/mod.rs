//! The per-entry pipeline: check, download, verify, extract, clean up.
//!
//! Entries are processed strictly in catalog order, one at a time. Failures
//! never cross entry boundaries; only a failed startup authentication aborts
//! the run.

mod state;

pub use state::{AbandonReason, EntryEvent, EntryState};

use std::path::Path;
use std::sync::Arc;

use crate::auth::Authenticator;
use crate::catalog::ArchiveCatalog;
use crate::config::FetchConfig;
use crate::downloader::{verify_checksum, ArchiveDownloader, ArchiveExtractor, ChecksumType};
use crate::error::{FetchError, Result};
use crate::http::HttpTransport;
use crate::resolver::UrlResolver;

/// Per-download progress callback: (filename, bytes so far, total if known).
pub type ProgressCallback = Box<dyn Fn(&str, u64, Option<u64>) + Send + Sync>;

/// Final state of one catalog entry after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    pub filename: String,
    pub state: EntryState,
}

/// Summary of a full run over the catalog.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<EntryOutcome>,
}

impl RunReport {
    pub fn completed(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.state == EntryState::Done)
    }

    pub fn abandoned(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.state, EntryState::Abandoned(_)))
    }
}

/// Drives the catalog through the download pipeline.
pub struct Fetcher {
    config: FetchConfig,
    catalog: ArchiveCatalog,
    authenticator: Authenticator,
    resolver: UrlResolver,
    downloader: ArchiveDownloader,
    progress: Option<ProgressCallback>,
}

impl Fetcher {
    pub fn new(
        config: FetchConfig,
        catalog: ArchiveCatalog,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let authenticator = Authenticator::new(Arc::clone(&transport));
        let resolver = UrlResolver::new(Arc::clone(&transport), config.region);
        let downloader = ArchiveDownloader::new(transport);

        Self {
            config,
            catalog,
            authenticator,
            resolver,
            downloader,
            progress: None,
        }
    }

    /// Attach a download progress callback.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Process every catalog entry in order.
    ///
    /// Fatal only when the startup authentication fails, before any entry is
    /// touched. Every other failure is confined to its entry and recorded in
    /// the returned report.
    pub async fn run(&self) -> Result<RunReport> {
        let mut token = self
            .authenticator
            .authenticate(&self.config.credentials)
            .await?
            .ok_or_else(|| FetchError::AuthenticationFailed {
                reason: "the identity provider rejected the credentials".to_string(),
            })?;

        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let mut report = RunReport::default();
        for (filename, expected) in self.catalog.iter() {
            let state = self.process_entry(filename, expected, &mut token).await;
            if let EntryState::Abandoned(reason) = state {
                log::warn!("giving up on {} ({:?})", filename, reason);
            }
            report.outcomes.push(EntryOutcome {
                filename: filename.to_string(),
                state,
            });
        }

        Ok(report)
    }

    /// Drive a single entry to a terminal state. Errors never escape; they
    /// surface as an `Abandoned` outcome.
    async fn process_entry(&self, filename: &str, expected: &str, token: &mut String) -> EntryState {
        let dest = self.config.output_dir.join(filename);
        let mut state = EntryState::NeedsCheck;

        loop {
            let event = match state {
                EntryState::NeedsCheck => self.check_existing(filename, expected, &dest).await,
                EntryState::NeedsDownload => self.download(filename, token, &dest).await,
                EntryState::Downloaded => self.verify_download(filename, expected, &dest).await,
                EntryState::NeedsExtract => self.extract(filename, &dest).await,
                EntryState::Done | EntryState::Abandoned(_) => break,
            };
            state = state.advance(event);
        }

        state
    }

    /// Step 1: examine any pre-existing file. A verified file skips the
    /// download entirely; a mismatching file is deleted and re-fetched.
    async fn check_existing(&self, filename: &str, expected: &str, dest: &Path) -> EntryEvent {
        if !dest.exists() {
            return EntryEvent::MissingOnDisk;
        }

        log::info!("verifying existing {}", filename);
        match self.verify(dest, expected).await {
            Ok(true) => {
                log::info!("{} already downloaded and verified", filename);
                EntryEvent::VerifiedOnDisk
            }
            Ok(false) => {
                log::warn!("digest mismatch for existing {}, re-downloading", filename);
                match tokio::fs::remove_file(dest).await {
                    Ok(()) => EntryEvent::CorruptOnDisk,
                    Err(e) => {
                        log::error!("failed to delete corrupt {}: {}", filename, e);
                        EntryEvent::FilesystemFailed
                    }
                }
            }
            Err(e) => {
                log::error!("failed to hash {}: {}", filename, e);
                EntryEvent::FilesystemFailed
            }
        }
    }

    /// Step 2: resolve a fresh URL (with the one re-auth retry) and stream
    /// the archive to disk.
    async fn download(&self, filename: &str, token: &mut String, dest: &Path) -> EntryEvent {
        let url = match self.resolve_with_reauth(filename, token).await {
            Ok(Some(url)) => url,
            Ok(None) => return EntryEvent::UrlUnavailable,
            Err(e) => {
                log::error!("URL resolution for {} failed: {}", filename, e);
                return EntryEvent::UrlUnavailable;
            }
        };

        log::info!("downloading {}", filename);
        let result = match &self.progress {
            Some(callback) => {
                let forward: &(dyn Fn(u64, Option<u64>) + Send + Sync) =
                    &|bytes, total| callback(filename, bytes, total);
                self.downloader.download(&url, dest, Some(forward)).await
            }
            None => self.downloader.download(&url, dest, None).await,
        };

        match result {
            Ok(bytes) => {
                log::debug!("downloaded {} ({} bytes)", filename, bytes);
                EntryEvent::DownloadFinished
            }
            Err(e) => {
                log::error!("download of {} failed: {}", filename, e);
                EntryEvent::DownloadFailed
            }
        }
    }

    /// Step 3: a fresh download must match the catalog before extraction.
    async fn verify_download(&self, filename: &str, expected: &str, dest: &Path) -> EntryEvent {
        match self.verify(dest, expected).await {
            Ok(true) => EntryEvent::VerifiedAfterDownload,
            Ok(false) => {
                log::error!("{} failed digest verification after download", filename);
                EntryEvent::CorruptAfterDownload
            }
            Err(e) => {
                log::error!("failed to hash {}: {}", filename, e);
                EntryEvent::FilesystemFailed
            }
        }
    }

    /// Step 4: unpack, then optionally reclaim the archive's disk space.
    async fn extract(&self, filename: &str, dest: &Path) -> EntryEvent {
        log::info!(
            "extracting {} to {}",
            filename,
            self.config.output_dir.display()
        );

        match ArchiveExtractor::extract(dest, &self.config.output_dir) {
            Ok(()) => {
                log::info!("extracted {}", filename);
                if self.config.delete_after_extract {
                    match tokio::fs::remove_file(dest).await {
                        Ok(()) => {
                            log::info!("deleted {} to reclaim space", filename);
                            EntryEvent::Extracted
                        }
                        Err(e) => {
                            log::error!("failed to delete {} after extraction: {}", filename, e);
                            EntryEvent::FilesystemFailed
                        }
                    }
                } else {
                    EntryEvent::Extracted
                }
            }
            Err(e) => {
                log::error!("extraction of {} failed: {}", filename, e);
                EntryEvent::ExtractionFailed
            }
        }
    }

    async fn verify(&self, dest: &Path, expected: &str) -> Result<bool> {
        let checksum_type = ChecksumType::from_hex_length(expected.len()).ok_or_else(|| {
            FetchError::Config(format!(
                "unrecognized digest length in catalog entry: {}",
                expected
            ))
        })?;
        verify_checksum(dest, expected, checksum_type).await
    }

    /// Resolve a download URL, re-authenticating at most once when the
    /// current token is rejected. The token is replaced only when the
    /// re-authentication succeeds; a second resolution failure gives up.
    async fn resolve_with_reauth(&self, filename: &str, token: &mut String) -> Result<Option<String>> {
        if let Some(url) = self.resolver.resolve(filename, token).await? {
            return Ok(Some(url));
        }

        log::warn!(
            "failed to get a link for {}; session may have expired, re-authenticating",
            filename
        );
        match self
            .authenticator
            .authenticate(&self.config.credentials)
            .await?
        {
            Some(fresh) => *token = fresh,
            None => return Ok(None),
        }

        self.resolver.resolve(filename, token).await
    }
}
