//! Extraction of Helm release tarballs.
//!
//! Helm publishes gzip-compressed tarballs laid out as `<os>-<arch>/helm`
//! plus license and readme files. Only regular files and directories are
//! materialised; links and device nodes are skipped. File modes from the
//! archive are kept so the binary is executable straight after extraction.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::{Component, Path};
use tar::{Archive, EntryType};
use tracing::debug;

use crate::core::HelmSwitchError;
use crate::utils::fs::ensure_dir;

/// Streams a `.tar.gz` from `reader` into `dest_dir`.
///
/// Entries with absolute paths or `..` components are rejected with
/// [`HelmSwitchError::UnsafeArchivePath`] before anything is written for them.
pub fn untar<R: Read>(dest_dir: &Path, reader: R) -> Result<()> {
    ensure_dir(dest_dir)?;

    let mut archive = Archive::new(GzDecoder::new(reader));

    for entry in archive.entries().context("Failed to read tar entries")? {
        let mut entry = entry.context("Failed to read tar entry")?;
        let entry_path = entry.path().context("Failed to get entry path")?.into_owned();

        if entry_path.is_absolute()
            || entry_path.components().any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(HelmSwitchError::UnsafeArchivePath {
                path: entry_path.display().to_string(),
            }
            .into());
        }

        let output_path = dest_dir.join(&entry_path);

        match entry.header().entry_type() {
            EntryType::Directory => {
                ensure_dir(&output_path)?;
            }
            EntryType::Regular | EntryType::Continuous => {
                if let Some(parent) = output_path.parent() {
                    ensure_dir(parent)?;
                }
                entry
                    .unpack(&output_path)
                    .with_context(|| format!("Failed to extract: {}", output_path.display()))?;
            }
            other => {
                debug!("Skipping {:?} entry {}", other, entry_path.display());
            }
        }
    }

    Ok(())
}

/// Opens `archive_path` and extracts it into `dest_dir`.
pub fn untar_file(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = std::fs::File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    untar(dest_dir, std::io::BufReader::new(file))
        .with_context(|| format!("Failed to extract {}", archive_path.display()))
}
