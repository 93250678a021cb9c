//! Recently used Helm versions
//!
//! The version store keeps a small `RECENT` file listing the last
//! [`MAX_RECENT_VERSIONS`] versions that were switched to, most recent first,
//! one bare `MAJOR.MINOR.PATCH` per line. The interactive menu shows these
//! ahead of the remote release list.
//!
//! # Corruption handling
//!
//! The file is a cache. If any line fails [`is_bare_version`] the whole file
//! is considered corrupt: [`get_recent_versions`] deletes it and reports no
//! versions, and [`add_recent`] rewrites it with only the new version.
//! Neither surfaces corruption as an error.
//!
//! # Ordering
//!
//! Adding a version that is already listed leaves the file untouched; its
//! position is not refreshed. New versions are prepended and the oldest entry
//! falls off once the bound is exceeded.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{MAX_RECENT_VERSIONS, RECENT_FILE};
use crate::utils::fs::{atomic_write, path_exists, remove_file_if_exists};
use crate::version::is_bare_version;

/// Location of the RECENT file inside `store_dir`.
#[must_use]
pub fn recent_file_path(store_dir: &Path) -> PathBuf {
    store_dir.join(RECENT_FILE)
}

/// Records `version` as recently used.
///
/// Versions that are not bare `MAJOR.MINOR.PATCH` (pre-releases) are not
/// recorded, since they would make the file fail validation on next read.
pub fn add_recent(version: &str, store_dir: &Path) -> Result<()> {
    if !is_bare_version(version) {
        debug!("Not recording {version} in {RECENT_FILE}: not a bare version");
        return Ok(());
    }

    let path = recent_file_path(store_dir);
    if !path_exists(&path) {
        return write_versions(&path, &[version.to_string()]);
    }

    let Some(mut lines) = read_entries(&path)? else {
        warn!("Resetting corrupt {}", path.display());
        return write_versions(&path, &[version.to_string()]);
    };

    if version_exists(version, &lines) {
        debug!("{version} already listed in {}", path.display());
        return Ok(());
    }

    lines.insert(0, version.to_string());
    lines.truncate(MAX_RECENT_VERSIONS);
    write_versions(&path, &lines)
}

/// Returns the recorded versions, most recent first.
///
/// A missing file yields an empty list. A corrupt file is deleted and also
/// yields an empty list.
pub fn get_recent_versions(store_dir: &Path) -> Result<Vec<String>> {
    let path = recent_file_path(store_dir);
    if !path_exists(&path) {
        return Ok(Vec::new());
    }

    let Some(lines) = read_entries(&path)? else {
        warn!("Discarding corrupt {}", path.display());
        remove_file_if_exists(&path)?;
        return Ok(Vec::new());
    };

    Ok(lines)
}

/// Exact membership test.
#[must_use]
pub fn version_exists(version: &str, versions: &[String]) -> bool {
    versions.iter().any(|v| v == version)
}

/// Drops repeated entries, keeping the first occurrence of each.
///
/// # Examples
///
/// ```rust
/// use helmswitch::recent::remove_duplicates;
///
/// let merged = vec!["1.2.3".to_string(), "9.9.9".to_string(), "1.2.3".to_string()];
/// assert_eq!(remove_duplicates(merged), vec!["1.2.3", "9.9.9"]);
/// ```
#[must_use]
pub fn remove_duplicates(versions: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    versions.into_iter().filter(|v| seen.insert(v.clone())).collect()
}

/// Reads the file's entries, or `None` when it is not valid UTF-8 or any
/// line fails [`is_bare_version`].
fn read_entries(path: &Path) -> Result<Option<Vec<String>>> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let Ok(content) = String::from_utf8(bytes) else {
        debug!("{} is not valid UTF-8", path.display());
        return Ok(None);
    };

    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    if let Some(bad) = lines.iter().find(|line| !is_bare_version(line)) {
        debug!("Invalid entry {bad:?} in {}", path.display());
        return Ok(None);
    }

    Ok(Some(lines))
}

fn write_versions(path: &Path, versions: &[String]) -> Result<()> {
    let mut content = versions.join("\n");
    content.push('\n');
    atomic_write(path, content.as_bytes())
}
