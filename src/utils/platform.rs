//! Host environment lookups: home directory, path expansion and PATH search.
//!
//! These are the inputs to [`crate::config::SwitchConfig::resolve`], which
//! runs them once at startup.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::core::HelmSwitchError;

/// Returns the current user's home directory.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| HelmSwitchError::HomeDirUnavailable.into())
}

/// Expands a leading `~/` and `$VAR` references in a user-supplied path.
///
/// # Examples
///
/// ```rust,no_run
/// use helmswitch::utils::platform::resolve_path;
///
/// # fn example() -> anyhow::Result<()> {
/// let bin = resolve_path("~/bin/helm")?;
/// # Ok(())
/// # }
/// ```
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .with_context(|| format!("Failed to expand path: {path}"))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Finds the last `name` executable on PATH.
///
/// PATH is searched front to back and the last hit wins, so an existing
/// install in a user directory placed late in PATH is picked up.
#[must_use]
pub fn find_last_on_path(name: &str) -> Option<PathBuf> {
    which::which_all(name).ok()?.last()
}

/// Like [`find_last_on_path`] but searching an explicit PATH value.
#[must_use]
pub fn find_last_in(name: &str, paths: &str, cwd: &Path) -> Option<PathBuf> {
    which::which_in_all(name, Some(paths), cwd).ok()?.last()
}
