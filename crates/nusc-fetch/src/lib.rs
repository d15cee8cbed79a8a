pub mod auth;
pub mod catalog;
pub mod config;
pub mod downloader;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod resolver;

pub use catalog::ArchiveCatalog;
pub use config::{Credentials, FetchConfig, FileConfig, Region};
pub use downloader::{verify_checksum, ArchiveDownloader, ArchiveExtractor, ChecksumType};
pub use error::{FetchError, Result};
pub use fetcher::{AbandonReason, EntryOutcome, EntryState, Fetcher, ProgressCallback, RunReport};
pub use http::{HttpClient, HttpResponse, HttpTransport};
