//! Checksum verification for downloaded archives.

use md5::{Digest, Md5};
use sha2::Sha256;
use std::path::Path;
use tokio::io::AsyncReadExt;

use crate::error::Result;

// Archives run to tens of gigabytes; hash in bounded chunks, never whole-file.
const BUF_SIZE: usize = 64 * 1024;

/// Supported digest types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumType {
    Md5,
    Sha256,
}

impl ChecksumType {
    /// Detect the digest type from the length of the hex string.
    pub fn from_hex_length(len: usize) -> Option<Self> {
        match len {
            32 => Some(ChecksumType::Md5),
            64 => Some(ChecksumType::Sha256),
            _ => None,
        }
    }
}

/// Compute the digest of a file as lowercase hex.
pub async fn compute_checksum(path: &Path, checksum_type: ChecksumType) -> Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut buf = vec![0u8; BUF_SIZE];

    match checksum_type {
        ChecksumType::Md5 => {
            let mut hasher = Md5::new();
            loop {
                let n = file.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            Ok(format!("{:x}", hasher.finalize()))
        }
        ChecksumType::Sha256 => {
            let mut hasher = Sha256::new();
            loop {
                let n = file.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            Ok(format!("{:x}", hasher.finalize()))
        }
    }
}

/// Verify a file against an expected hex digest (case-insensitive).
///
/// No side effects; I/O errors propagate to the caller.
pub async fn verify_checksum(
    path: &Path,
    expected: &str,
    checksum_type: ChecksumType,
) -> Result<bool> {
    let actual = compute_checksum(path, checksum_type).await?;
    Ok(actual.eq_ignore_ascii_case(expected))
}
