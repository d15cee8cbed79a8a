//! Archive extraction (tar, tar.gz).

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use crate::error::{FetchError, Result};

/// Supported archive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    Tar,
    TarGz,
}

impl ArchiveType {
    /// Detect archive type from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let path_str = path.to_string_lossy().to_lowercase();

        if path_str.ends_with(".tar.gz") || path_str.ends_with(".tgz") {
            Some(ArchiveType::TarGz)
        } else if path_str.ends_with(".tar") {
            Some(ArchiveType::Tar)
        } else {
            None
        }
    }
}

/// Archive extractor.
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Extract an archive into `dest_dir`, preserving the archive's internal
    /// relative paths.
    pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<()> {
        let archive_type = ArchiveType::from_path(archive_path).ok_or_else(|| {
            FetchError::ExtractionFailed {
                archive: archive_path.display().to_string(),
                reason: "unknown archive type".to_string(),
            }
        })?;

        std::fs::create_dir_all(dest_dir)?;

        let file = File::open(archive_path)?;
        let reader = BufReader::new(file);
        match archive_type {
            ArchiveType::Tar => Self::extract_tar_reader(reader, archive_path, dest_dir),
            ArchiveType::TarGz => {
                Self::extract_tar_reader(GzDecoder::new(reader), archive_path, dest_dir)
            }
        }
    }

    fn extract_tar_reader<R: Read>(reader: R, archive_path: &Path, dest_dir: &Path) -> Result<()> {
        let fail = |reason: String| FetchError::ExtractionFailed {
            archive: archive_path.display().to_string(),
            reason,
        };

        let mut archive = tar::Archive::new(reader);
        for entry in archive
            .entries()
            .map_err(|e| fail(format!("failed to read tar: {}", e)))?
        {
            let mut entry = entry.map_err(|e| fail(format!("failed to read tar entry: {}", e)))?;
            let path: PathBuf = entry
                .path()
                .map_err(|e| fail(format!("invalid path in tar: {}", e)))?
                .into_owned();

            if !is_safe_member_path(&path) {
                return Err(fail(format!(
                    "path traversal detected in archive: {}",
                    path.display()
                )));
            }

            let outpath = dest_dir.join(&path);
            if entry.header().entry_type().is_dir() {
                std::fs::create_dir_all(&outpath)?;
            } else {
                if let Some(parent) = outpath.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                entry
                    .unpack(&outpath)
                    .map_err(|e| fail(format!("failed to extract {}: {}", path.display(), e)))?;
            }
        }

        Ok(())
    }
}

/// True when a member path is relative and contains no parent-directory
/// components, so joining it onto the destination cannot escape it.
fn is_safe_member_path(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn build_tgz(dest: &Path, members: &[(&str, &[u8])]) {
        let file = File::create(dest).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in members {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *content).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap().flush().unwrap();
    }

    #[test]
    fn archive_type_from_path() {
        assert_eq!(
            ArchiveType::from_path(Path::new("v1.0-trainval_meta.tgz")),
            Some(ArchiveType::TarGz)
        );
        assert_eq!(
            ArchiveType::from_path(Path::new("blob.tar.gz")),
            Some(ArchiveType::TarGz)
        );
        assert_eq!(
            ArchiveType::from_path(Path::new("blob.tar")),
            Some(ArchiveType::Tar)
        );
        assert_eq!(ArchiveType::from_path(Path::new("blob.zip")), None);
    }

    #[test]
    fn extracts_members_preserving_relative_paths() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("sample.tgz");
        build_tgz(
            &archive_path,
            &[
                ("maps/map.png", b"pixels".as_slice()),
                ("v1.0/meta.json", b"{}".as_slice()),
            ],
        );

        let out = dir.path().join("out");
        ArchiveExtractor::extract(&archive_path, &out).unwrap();

        assert_eq!(std::fs::read(out.join("maps/map.png")).unwrap(), b"pixels");
        assert_eq!(std::fs::read(out.join("v1.0/meta.json")).unwrap(), b"{}");
    }

    #[test]
    fn unknown_archive_type_is_an_extraction_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.zip");
        std::fs::write(&path, b"PK").unwrap();

        let err = ArchiveExtractor::extract(&path, dir.path()).unwrap_err();
        assert!(matches!(err, FetchError::ExtractionFailed { .. }));
    }

    #[test]
    fn corrupt_archive_is_an_extraction_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.tgz");
        std::fs::write(&path, b"definitely not gzip").unwrap();

        let err = ArchiveExtractor::extract(&path, dir.path()).unwrap_err();
        assert!(matches!(err, FetchError::ExtractionFailed { .. }));
    }

    #[test]
    fn member_path_safety() {
        assert!(is_safe_member_path(Path::new("samples/file.bin")));
        assert!(is_safe_member_path(Path::new("./samples/file.bin")));
        assert!(!is_safe_member_path(Path::new("../escape.bin")));
        assert!(!is_safe_member_path(Path::new("samples/../../escape.bin")));
        assert!(!is_safe_member_path(Path::new("/etc/passwd")));
    }
}
