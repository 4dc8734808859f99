use std::path::PathBuf;
use crate::download::DownloadError;
use crate::extract::ExtractionError;

/// Exit status used when the run was stopped by SIGINT or SIGTERM.
pub const EXIT_INTERRUPTED: u8 = 130;

/// Every way an installation can fail.
///
/// All of them are fatal: the pipeline never retries or resumes, it stops at
/// the first error and the work directory is removed on the way out.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// The host OS/architecture pair is not in the lookup table.
    #[error("unsupported platform: {os}/{arch}")]
    UnsupportedPlatform {
        os: String,
        arch: String,
    },

    /// An explicit target override is not one of the published targets.
    #[error("unsupported target: {0}")]
    UnsupportedTarget(String),

    /// The latest release could not be determined.
    #[error("could not resolve the latest release of {repo}: {reason}")]
    ReleaseUnavailable {
        repo: String,
        reason: String,
    },

    #[error(transparent)]
    Download(#[from] DownloadError),

    /// `checksums.txt` has no line for the downloaded artifact.
    #[error("no checksum found for {artifact} in the release checksum manifest")]
    MissingChecksum {
        artifact: String,
    },

    /// The archive does not hash to the published digest.
    #[error("checksum mismatch for {artifact}\n  expected: {expected}\n  actual:   {actual}")]
    ChecksumMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The archive extracted fine but does not contain the binary.
    #[error("binary '{name}' not found in the release archive")]
    BinaryNotFound {
        name: String,
    },

    /// Placing the binary into the install directory failed.
    #[error("failed to install {}: {reason}", path.display())]
    Install {
        path: PathBuf,
        reason: String,
    },

    #[error("interrupted")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstallError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            InstallError::Interrupted
            | InstallError::Download(DownloadError::Interrupted) => EXIT_INTERRUPTED,
            _ => 1,
        }
    }
}
