//! The send-request-get-response capability.
//!
//! The authenticator, resolver, and downloader depend on this trait instead
//! of a concrete client, so they can be exercised against in-memory
//! implementations with no network access.

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// Optional per-download progress callback: (bytes so far, total when the
/// server reported one).
pub type Progress<'a> = Option<&'a (dyn Fn(u64, Option<u64>) + Send + Sync)>;

/// A raw HTTP response. Status is surfaced rather than turned into an error
/// so callers can implement their own absent-on-rejection contracts.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Blocking-until-complete HTTP operations used by the pipeline.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a body with the given headers and return the raw response.
    async fn post(&self, url: &str, headers: &[(&str, &str)], body: String) -> Result<HttpResponse>;

    /// GET with the given headers and return the raw response.
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;

    /// Streaming GET written to `dest` chunk by chunk; returns bytes written.
    ///
    /// On a mid-transfer failure the partially-written file is left on disk;
    /// the checksum pass detects it on the next attempt.
    async fn download(&self, url: &str, dest: &Path, progress: Progress<'_>) -> Result<u64>;
}
