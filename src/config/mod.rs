//! Configuration for a helmswitch run.
//!
//! Two layers:
//!
//! - [`GlobalConfig`] mirrors the optional TOML config file.
//! - [`SwitchConfig`] is the fully resolved, immutable configuration the
//!   install pipeline works with. The entry point builds it once with
//!   [`SwitchConfig::resolve`] and passes it down by reference.
//!
//! Resolution order for the active symlink path is: `--bin` flag, then
//! `bin_path` from the config file, then the last `helm` found on PATH,
//! then `/usr/local/bin/helm`. Resolving never modifies the filesystem.

mod global;

pub use global::GlobalConfig;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::{
    BINARY_NAME, DEFAULT_BIN_PATH, DEFAULT_DOWNLOAD_BASE_URL, DEFAULT_HTTP_TIMEOUT,
    DEFAULT_RELEASE_PAGES, DEFAULT_RELEASES_URL, GITHUB_TOKEN_ENV, VERSION_STORE_DIR,
};
use crate::utils::platform::{find_last_on_path, get_home_dir, resolve_path};

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchConfig {
    /// Directory holding `helm_<version>` binaries and the RECENT file
    pub store_dir: PathBuf,
    /// Location of the active `helm` symlink
    pub bin_path: PathBuf,
    pub releases_url: String,
    pub download_base_url: String,
    pub github_token: Option<String>,
    pub release_pages: u32,
    pub timeout: Duration,
    pub show_progress: bool,
}

impl SwitchConfig {
    /// A configuration with default endpoints for the given locations.
    #[must_use]
    pub fn new(store_dir: impl Into<PathBuf>, bin_path: impl Into<PathBuf>) -> Self {
        Self {
            store_dir: store_dir.into(),
            bin_path: bin_path.into(),
            releases_url: DEFAULT_RELEASES_URL.to_string(),
            download_base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
            github_token: None,
            release_pages: DEFAULT_RELEASE_PAGES,
            timeout: DEFAULT_HTTP_TIMEOUT,
            show_progress: false,
        }
    }

    /// Builds the run configuration from the config file and CLI overrides.
    pub fn resolve(global: &GlobalConfig, cli_bin: Option<&str>, show_progress: bool) -> Result<Self> {
        let store_dir = match &global.store_dir {
            Some(dir) => resolve_path(dir)?,
            None => default_store_dir(&get_home_dir()?),
        };

        let bin_path = match cli_bin.or(global.bin_path.as_deref()) {
            Some(path) => resolve_path(path)?,
            None => default_bin_path(),
        };

        let github_token = global
            .github_token
            .clone()
            .or_else(|| std::env::var(GITHUB_TOKEN_ENV).ok())
            .filter(|t| !t.is_empty());

        debug!("Version store: {}", store_dir.display());
        debug!("Bin path: {}", bin_path.display());

        Ok(Self {
            store_dir,
            bin_path,
            releases_url: global.releases_url.clone(),
            download_base_url: global.download_base_url.clone(),
            github_token,
            release_pages: global.release_pages,
            timeout: Duration::from_secs(global.timeout_secs),
            show_progress,
        })
    }
}

/// `<home>/.helm.versions`
#[must_use]
pub fn default_store_dir(home: &Path) -> PathBuf {
    home.join(VERSION_STORE_DIR)
}

/// The last `helm` on PATH, or `/usr/local/bin/helm`.
#[must_use]
pub fn default_bin_path() -> PathBuf {
    find_last_on_path(BINARY_NAME).unwrap_or_else(|| PathBuf::from(DEFAULT_BIN_PATH))
}
