//! Atomic file writes.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

use super::dirs::ensure_dir;

/// Writes `content` to `path` so readers never observe a partial file.
///
/// The data goes to a sibling `.tmp` file which is synced and then renamed
/// over the destination. Parent directories are created if needed.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().context("Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}
