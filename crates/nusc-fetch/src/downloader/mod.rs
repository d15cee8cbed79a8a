//! Archive downloading, integrity verification, and extraction.

mod archive;
mod checksum;
mod file;

pub use archive::{ArchiveExtractor, ArchiveType};
pub use checksum::{compute_checksum, verify_checksum, ChecksumType};
pub use file::ArchiveDownloader;
