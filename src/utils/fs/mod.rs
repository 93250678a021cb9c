//! Filesystem helpers used by the install pipeline.
//!
//! All functions here are synchronous and return [`anyhow::Result`] with the
//! offending path in the error context.
//!
//! # Modules
//!
//! - [`dirs`] - directory creation ([`ensure_dir`])
//! - [`atomic`] - write-then-rename file updates ([`atomic_write`])
//! - [`symlinks`] - symlink inspection, creation and atomic replacement

pub mod atomic;
pub mod dirs;
pub mod symlinks;

pub use atomic::atomic_write;
pub use dirs::{dir_exists, ensure_dir};
pub use symlinks::{create_symlink, is_symlink, remove_symlink, set_executable, swap_symlink};

use anyhow::{Context, Result};
use std::path::Path;

/// Returns `true` if something exists at `path`.
///
/// Dangling symlinks count as absent; use [`is_symlink`] for those.
#[must_use]
pub fn path_exists(path: &Path) -> bool {
    path.exists()
}

/// Renames `src` to `dst`, replacing `dst` if it is a file.
pub fn rename_file(src: &Path, dst: &Path) -> Result<()> {
    std::fs::rename(src, dst)
        .with_context(|| format!("Failed to rename {} to {}", src.display(), dst.display()))
}

/// Removes a file if it exists, ignoring a missing file.
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}
