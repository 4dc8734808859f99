use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use sha2::{Digest, Sha256};
use crate::error::InstallError;

/// Strips the `sha256:` prefix from a hash if present.
pub fn format_hash(hash: &str) -> &str {
    hash.strip_prefix("sha256:").unwrap_or(hash)
}

/// Looks up the expected digest of `artifact` in a checksum manifest.
///
/// The manifest has one `<sha256> <filename>` entry per line. The first line
/// naming exactly `artifact` wins and its first whitespace-delimited token is
/// returned; anything after the file name is ignored. The `*` marker that
/// `sha256sum --binary` puts in front of file names is accepted.
pub fn expected_digest(manifest: &str, artifact: &str) -> Option<String> {
    manifest.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        let digest = tokens.next()?;
        tokens
            .any(|name| name.strip_prefix('*').unwrap_or(name) == artifact)
            .then(|| format_hash(digest).to_string())
    })
}

/// Hex-encoded SHA-256 digest of the file at `path`.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Verifies `archive` against its entry in `manifest`.
///
/// Returns the verified digest.
///
/// # Errors
///
/// - [`InstallError::MissingChecksum`] if the manifest has no entry for
///   `artifact`.
/// - [`InstallError::ChecksumMismatch`] if the digests differ in any way.
pub fn verify_archive(archive: &Path, manifest: &str, artifact: &str) -> Result<String, InstallError> {
    let expected = expected_digest(manifest, artifact).ok_or_else(|| InstallError::MissingChecksum {
        artifact: artifact.to_string(),
    })?;
    let actual = sha256_file(archive)?;
    log::debug!("{artifact}: expected {expected}, actual {actual}");

    if expected != actual {
        return Err(InstallError::ChecksumMismatch {
            artifact: artifact.to_string(),
            expected,
            actual,
        });
    }
    Ok(actual)
}
