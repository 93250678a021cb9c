//! The optional helmswitch config file.
//!
//! Located at `$HELMSWITCH_CONFIG` if set, otherwise
//! `~/.helmswitch/config.toml`. A missing file means all defaults. Every key
//! is optional:
//!
//! ```toml
//! bin_path = "~/bin/helm"
//! store_dir = "~/.helm.versions"
//! releases_url = "https://api.github.com/repos/helm/helm/releases"
//! download_base_url = "https://get.helm.sh"
//! github_token = "ghp_..."
//! release_pages = 2
//! timeout_secs = 300
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{
    CONFIG_PATH_ENV, DEFAULT_DOWNLOAD_BASE_URL, DEFAULT_HTTP_TIMEOUT, DEFAULT_RELEASE_PAGES,
    DEFAULT_RELEASES_URL,
};

fn default_releases_url() -> String {
    DEFAULT_RELEASES_URL.to_string()
}

fn default_download_base_url() -> String {
    DEFAULT_DOWNLOAD_BASE_URL.to_string()
}

const fn default_release_pages() -> u32 {
    DEFAULT_RELEASE_PAGES
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT.as_secs()
}

/// Settings read from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Active symlink location; `~` and `$VAR` are expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_path: Option<String>,

    /// Version store directory; `~` and `$VAR` are expanded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<String>,

    #[serde(default = "default_releases_url")]
    pub releases_url: String,

    /// Host serving `helm-v<ver>-<os>-<arch>.tar.gz` and `.sha256` files
    #[serde(default = "default_download_base_url")]
    pub download_base_url: String,

    /// Sent as a bearer token to the releases API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    /// Pages of 100 releases to fetch for the selection menu
    #[serde(default = "default_release_pages")]
    pub release_pages: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            bin_path: None,
            store_dir: None,
            releases_url: default_releases_url(),
            download_base_url: default_download_base_url(),
            github_token: None,
            release_pages: default_release_pages(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GlobalConfig {
    /// Loads from `path`, or from [`default_path`](Self::default_path) when
    /// `None`. A missing file yields the defaults.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// `$HELMSWITCH_CONFIG`, else `~/.helmswitch/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let home = crate::utils::platform::get_home_dir()?;
        Ok(home.join(".helmswitch").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.releases_url, DEFAULT_RELEASES_URL);
        assert_eq!(config.download_base_url, "https://get.helm.sh");
        assert_eq!(config.release_pages, 2);
        assert_eq!(config.timeout_secs, 300);
        assert!(config.bin_path.is_none());
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "bin_path = \"~/bin/helm\"\nrelease_pages = 5\n").unwrap();

        let config = GlobalConfig::load_from(&path).await.unwrap();
        assert_eq!(config.bin_path.as_deref(), Some("~/bin/helm"));
        assert_eq!(config.release_pages, 5);
        assert_eq!(config.download_base_url, DEFAULT_DOWNLOAD_BASE_URL);
    }

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config =
            GlobalConfig::load_with_optional(Some(temp.path().join("absent.toml"))).await.unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn test_unknown_key_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "bin_pth = \"/tmp/helm\"\n").unwrap();

        let err = GlobalConfig::load_from(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    #[serial]
    fn test_default_path_env_override() {
        // SAFETY: serialized with other env-mutating tests
        unsafe { std::env::set_var(CONFIG_PATH_ENV, "/etc/helmswitch.toml") };
        let path = GlobalConfig::default_path().unwrap();
        unsafe { std::env::remove_var(CONFIG_PATH_ENV) };

        assert_eq!(path, PathBuf::from("/etc/helmswitch.toml"));
    }
}
