//! Release archive extraction.
//!
//! Unpacks `.tar.gz` archives into the work directory, refusing entries that
//! would land outside of it, and finds the binary among the extracted files.

use std::fs::File;
use std::path::{Component, Path, PathBuf};
use flate2::read::GzDecoder;
use tar::Archive;
use walkdir::WalkDir;

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An entry tries to escape the destination directory.
    #[error("path traversal detected in archive entry: {path}")]
    PathTraversal {
        path: String,
    },

    #[error("archive contains no files")]
    EmptyArchive,
}

/// Extracts the gzip-compressed tarball at `archive` into `dest`.
///
/// Returns the paths of the extracted regular files, relative to `dest`.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let file = File::open(archive)?;
    let mut tarball = Archive::new(GzDecoder::new(file));
    let mut extracted = Vec::new();

    for entry in tarball.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.into_owned();
        validate_entry_path(&entry_path)?;

        let is_file = entry.header().entry_type().is_file();
        entry.unpack_in(dest)?;
        if is_file {
            extracted.push(entry_path);
        }
    }

    if extracted.is_empty() {
        return Err(ExtractionError::EmptyArchive);
    }
    log::debug!("extracted {} file(s) into {}", extracted.len(), dest.display());
    Ok(extracted)
}

/// Rejects absolute entry paths and any `..` component.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    let escapes = path.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// Finds the regular file called `name` under `dir`, preferring the
/// shallowest match.
pub fn locate_binary(dir: &Path, name: &str) -> Option<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == name)
        .min_by_key(|entry| entry.depth())
        .map(|entry| entry.into_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tar::{Builder, Header};
    use tempfile::tempdir;

    fn write_tarball(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut builder = Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, data) in entries {
            let mut header = Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_extract_and_locate_binary() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("release.tar.gz");
        write_tarball(&archive, &[("polymarket", b"#!/bin/sh\n"), ("README.md", b"docs")]);

        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        let files = extract_archive(&archive, &out).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(locate_binary(&out, "polymarket"), Some(out.join("polymarket")));
        assert_eq!(locate_binary(&out, "missing"), None);
    }

    #[test]
    fn test_locate_binary_in_subdirectory() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("release.tar.gz");
        write_tarball(&archive, &[("polymarket-v1/polymarket", b"bin")]);

        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        extract_archive(&archive, &out).unwrap();

        assert_eq!(
            locate_binary(&out, "polymarket"),
            Some(out.join("polymarket-v1").join("polymarket"))
        );
    }

    #[test]
    fn test_validate_entry_path_rejects_traversal() {
        assert!(validate_entry_path(Path::new("../etc/passwd")).is_err());
        assert!(validate_entry_path(Path::new("/usr/local/bin/polymarket")).is_err());
        assert!(validate_entry_path(Path::new("bin/polymarket")).is_ok());
    }

    #[test]
    fn test_empty_archive_is_rejected() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("empty.tar.gz");
        write_tarball(&archive, &[]);
        let err = extract_archive(&archive, dir.path()).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyArchive));
    }

    #[test]
    fn test_corrupt_archive_is_io_error() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("corrupt.tar.gz");
        std::fs::write(&archive, b"definitely not gzip").unwrap();
        let err = extract_archive(&archive, dir.path()).unwrap_err();
        assert!(matches!(err, ExtractionError::Io(_)));
    }
}
