//! Directory creation for the version store.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// New directories are created with mode `0755` on Unix. Calling this on an
/// existing directory is a no-op.
///
/// # Errors
///
/// Returns an error if the path exists but is not a directory, or if creation fails.
///
/// # Examples
///
/// ```rust,no_run
/// use helmswitch::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// ensure_dir(Path::new("/home/me/.helm.versions"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }

        builder.create(path).with_context(|| {
            format!(
                "Failed to create directory: {}\n\nCheck directory permissions and path validity",
                path.display()
            )
        })?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Returns `true` if `path` is an existing directory.
#[must_use]
pub fn dir_exists(path: &Path) -> bool {
    path.is_dir()
}
