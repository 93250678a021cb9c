//! Symlink and permission helpers for the active `helm` link.
//!
//! The active symlink is replaced with [`swap_symlink`], which stages a new
//! link next to the target and renames it into place. On POSIX systems the
//! rename is atomic, so `helm` on PATH resolves to either the old or the new
//! version at every instant.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::HelmSwitchError;

/// Returns `true` if `path` is a symlink, including a dangling one.
#[must_use]
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).map(|m| m.file_type().is_symlink()).unwrap_or(false)
}

/// Removes the symlink at `path`.
///
/// Callers check [`is_symlink`] first; removing a missing link is an error.
pub fn remove_symlink(path: &Path) -> Result<()> {
    fs::remove_file(path)
        .with_context(|| format!("Failed to remove symlink: {}", path.display()))
}

/// Creates a symlink at `link` pointing to `target`.
pub fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    std::os::unix::fs::symlink(target, link).with_context(|| {
        format!("Failed to create symlink {} -> {}", link.display(), target.display())
    })?;

    #[cfg(windows)]
    std::os::windows::fs::symlink_file(target, link).with_context(|| {
        format!("Failed to create symlink {} -> {}", link.display(), target.display())
    })?;

    Ok(())
}

/// Points `link` at `target`, replacing any previous symlink in one step.
///
/// A regular file or directory at `link` is never replaced; that case
/// returns [`HelmSwitchError::NotASymlink`].
pub fn swap_symlink(target: &Path, link: &Path) -> Result<()> {
    if link.symlink_metadata().is_ok() && !is_symlink(link) {
        return Err(HelmSwitchError::NotASymlink {
            path: link.display().to_string(),
        }
        .into());
    }

    let staged = staged_link_path(link);
    if is_symlink(&staged) {
        remove_symlink(&staged)?;
    }
    create_symlink(target, &staged)?;

    if let Err(e) = super::rename_file(&staged, link) {
        // leave the previous link alone and drop the staged one
        let _ = remove_symlink(&staged);
        return Err(e);
    }

    tracing::debug!("Linked {} -> {}", link.display(), target.display());
    Ok(())
}

fn staged_link_path(link: &Path) -> PathBuf {
    let mut name = link.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".helmswitch-new");
    link.with_file_name(name)
}

/// Sets the permission bits of `path` to `0755`.
pub fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).with_context(|| {
            format!("Failed to set executable permissions on {}", path.display())
        })?;
    }

    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}
