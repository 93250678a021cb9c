//! SHA-256 verification of downloaded archives.
//!
//! Every Helm release archive on the download host has a `.sha256` sidecar
//! whose first whitespace-delimited token is the hex digest. Both the bare
//! `digest` form and the `digest  filename` form produced by `sha256sum`
//! are accepted.
//!
//! A mismatch is never recoverable: the install pipeline stops before
//! extraction and leaves the active symlink alone.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};

use crate::constants::HASH_BUFFER_SIZE;
use crate::core::HelmSwitchError;

/// Expected and computed digests of one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumReport {
    /// Digest read from the sidecar
    pub expected: String,
    /// Digest of the artifact bytes
    pub actual: String,
}

impl ChecksumReport {
    /// Case-insensitive digest comparison.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.expected.eq_ignore_ascii_case(&self.actual)
    }
}

/// SHA-256 checksum operations.
pub struct ChecksumVerifier;

impl ChecksumVerifier {
    /// Computes the lowercase hex SHA-256 digest of a file.
    pub async fn compute_sha256(file_path: &Path) -> Result<String> {
        debug!("Computing SHA256 checksum for: {}", file_path.display());

        let mut file = tokio::fs::File::open(file_path)
            .await
            .with_context(|| format!("Failed to open file: {}", file_path.display()))?;

        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

        loop {
            let read = file
                .read(&mut buffer)
                .await
                .with_context(|| format!("Failed to read file: {}", file_path.display()))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(hex::encode(hasher.finalize()))
    }

    /// Reads the first whitespace-delimited token of a checksum file.
    pub async fn read_expected_checksum(checksum_file: &Path) -> Result<String> {
        let content = tokio::fs::read_to_string(checksum_file)
            .await
            .with_context(|| format!("Failed to read checksum file: {}", checksum_file.display()))?;

        content.split_whitespace().next().map(str::to_string).ok_or_else(|| {
            HelmSwitchError::MalformedChecksumFile {
                path: checksum_file.display().to_string(),
            }
            .into()
        })
    }

    /// Computes both digests for `artifact` and its sidecar.
    pub async fn compare(artifact: &Path, checksum_file: &Path) -> Result<ChecksumReport> {
        let expected = Self::read_expected_checksum(checksum_file).await?;
        let actual = Self::compute_sha256(artifact).await?;
        Ok(ChecksumReport {
            expected,
            actual,
        })
    }

    /// Returns `true` iff the artifact digest equals the published one.
    ///
    /// I/O failures and an empty sidecar are errors, not `false`.
    pub async fn verify_checksum(artifact: &Path, checksum_file: &Path) -> Result<bool> {
        info!("Verifying checksum for: {}", artifact.display());

        let report = Self::compare(artifact, checksum_file).await?;
        if report.is_match() {
            info!("Checksum verification successful");
            Ok(true)
        } else {
            warn!(
                "Checksum verification failed!\n  Expected: {}\n  Actual:   {}",
                report.expected, report.actual
            );
            Ok(false)
        }
    }

    /// Like [`verify_checksum`](Self::verify_checksum) but a mismatch is a
    /// [`HelmSwitchError::ChecksumMismatch`] error.
    pub async fn ensure_checksum(artifact: &Path, checksum_file: &Path) -> Result<()> {
        let report = Self::compare(artifact, checksum_file).await?;
        if report.is_match() {
            info!("Checksum verified for {}", artifact.display());
            return Ok(());
        }

        Err(HelmSwitchError::ChecksumMismatch {
            file: artifact
                .file_name()
                .map_or_else(|| artifact.display().to_string(), |n| n.to_string_lossy().into_owned()),
            expected: report.expected,
            actual: report.actual,
        }
        .into())
    }
}
