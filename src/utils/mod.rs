//! Cross-cutting utilities: filesystem helpers, host lookups and progress bars.

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{ensure_dir, path_exists, rename_file};
pub use platform::{get_home_dir, resolve_path};
