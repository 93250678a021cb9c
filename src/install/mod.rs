//! Installing and switching Helm versions
//!
//! An install is split into two phases so that a failure never leaves `helm`
//! unresolvable on PATH:
//!
//! 1. **Stage**: download `helm-v<ver>-<os>-<arch>.tar.gz` and its `.sha256`
//!    sidecar into the version store, verify the digest, extract into a
//!    private staging directory, move `<os>-<arch>/helm` to
//!    `<store>/helm_<ver>` and mark it `0755`.
//! 2. **Commit**: atomically repoint the active symlink at the new binary.
//!
//! Any error during staging leaves the previous symlink untouched. The
//! downloaded archive, its sidecar and the staging directory are removed
//! whether staging succeeds or not.
//!
//! # Modules
//!
//! - [`platform`] - `(Os, Arch)` detection and the asset naming template
//! - [`download`] - streaming downloads named after the URL
//! - [`verification`] - SHA-256 checks against the sidecar
//! - [`archive`] - `.tar.gz` extraction
//!
//! # Example
//!
//! ```rust,no_run
//! use helmswitch::config::SwitchConfig;
//! use helmswitch::install::Installer;
//!
//! # async fn example(config: SwitchConfig) -> anyhow::Result<()> {
//! let installer = Installer::for_host(&config)?;
//! installer.install_direct("3.14.0").await?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod download;
pub mod platform;
pub mod verification;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::SwitchConfig;
use crate::constants::{CHECKSUM_SUFFIX, INSTALL_PREFIX};
use crate::core::HelmSwitchError;
use crate::release::{Release, find_asset, find_release};
use crate::utils::fs::{
    dir_exists, ensure_dir, path_exists, remove_file_if_exists, rename_file, set_executable,
    swap_symlink,
};

pub use download::Downloader;
pub use platform::{Arch, Os, Platform};
pub use verification::ChecksumVerifier;

/// Installs versions into the store and switches the active symlink.
pub struct Installer<'a> {
    config: &'a SwitchConfig,
    platform: Platform,
    downloader: Downloader,
}

impl<'a> Installer<'a> {
    #[must_use]
    pub const fn new(config: &'a SwitchConfig, platform: Platform, downloader: Downloader) -> Self {
        Self {
            config,
            platform,
            downloader,
        }
    }

    /// An installer for the running host using the configured HTTP settings.
    pub fn for_host(config: &'a SwitchConfig) -> Result<Self> {
        let platform = Platform::detect()?;
        let client = download::http_client(config.timeout)?;
        Ok(Self::new(config, platform, Downloader::new(client, config.show_progress)))
    }

    #[must_use]
    pub fn installed_binary_path(&self, version: &str) -> PathBuf {
        installed_binary_path(self.config, version)
    }

    #[must_use]
    pub fn is_installed(&self, version: &str) -> bool {
        is_installed(self.config, version)
    }

    /// Archive URL on the download host, e.g.
    /// `https://get.helm.sh/helm-v3.14.0-linux-amd64.tar.gz`.
    #[must_use]
    pub fn direct_download_url(&self, version: &str) -> String {
        format!(
            "{}/{}",
            self.config.download_base_url.trim_end_matches('/'),
            self.platform.asset_name(version)
        )
    }

    /// See [`switch_to`].
    pub fn switch_to(&self, version: &str) -> Result<()> {
        switch_to(self.config, version)
    }

    /// Installs `version` as listed in `releases` and activates it.
    ///
    /// Fails fast with [`HelmSwitchError::VersionNotFound`] when no release
    /// is tagged `v<version>` and with [`HelmSwitchError::NoMatchingAsset`]
    /// when the release has nothing for this host. Returns the version
    /// store directory.
    pub async fn install(&self, version: &str, releases: &[Release]) -> Result<PathBuf> {
        check_bin_dir(self.config)?;

        let release = find_release(releases, version)?;
        let asset = find_asset(release, version, &self.platform)?;
        debug!("Matched release asset {}", asset.name);

        let url = self.direct_download_url(version);
        self.stage_and_commit(version, &url).await
    }

    /// Installs `version` straight from the download host without consulting
    /// the release list. Returns the version store directory.
    pub async fn install_direct(&self, version: &str) -> Result<PathBuf> {
        check_bin_dir(self.config)?;

        let url = self.direct_download_url(version);
        self.stage_and_commit(version, &url).await
    }

    async fn stage_and_commit(&self, version: &str, url: &str) -> Result<PathBuf> {
        let binary = self
            .stage(version, url)
            .await
            .with_context(|| format!("Failed to install helm {version}"))?;
        commit(self.config, version, &binary)?;
        Ok(self.config.store_dir.clone())
    }

    /// Everything up to, but excluding, touching the active symlink.
    async fn stage(&self, version: &str, url: &str) -> Result<PathBuf> {
        let store = &self.config.store_dir;
        ensure_dir(store)?;

        let checksum_url = format!("{url}{CHECKSUM_SUFFIX}");
        let artifact = store.join(download::file_name_from_url(url)?);
        let sidecar = store.join(download::file_name_from_url(&checksum_url)?);

        let result = self.download_verify_extract(version, url, &checksum_url).await;

        for leftover in [&artifact, &sidecar] {
            if let Err(e) = remove_file_if_exists(leftover) {
                warn!("Could not clean up {}: {e:#}", leftover.display());
            }
        }

        result
    }

    async fn download_verify_extract(
        &self,
        version: &str,
        url: &str,
        checksum_url: &str,
    ) -> Result<PathBuf> {
        let store = &self.config.store_dir;

        let artifact = self.downloader.download_from_url(store, url).await?;
        let sidecar = self.downloader.download_from_url(store, checksum_url).await?;

        ChecksumVerifier::ensure_checksum(&artifact, &sidecar).await?;

        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(store)
            .with_context(|| format!("Failed to create staging directory in {}", store.display()))?;

        let archive_path = artifact.clone();
        let staging_path = staging.path().to_path_buf();
        tokio::task::spawn_blocking(move || archive::untar_file(&archive_path, &staging_path))
            .await
            .context("Extraction task panicked")??;

        let extracted = staging.path().join(self.platform.binary_path_in_archive());
        if !extracted.is_file() {
            return Err(HelmSwitchError::ExtractedBinaryMissing {
                path: self.platform.binary_path_in_archive(),
            }
            .into());
        }

        let binary = self.installed_binary_path(version);
        rename_file(&extracted, &binary)?;
        set_executable(&binary)?;

        info!("Staged helm {version} at {}", binary.display());
        Ok(binary)
    }
}

/// `<store>/helm_<version>`
#[must_use]
pub fn installed_binary_path(config: &SwitchConfig, version: &str) -> PathBuf {
    config.store_dir.join(format!("{INSTALL_PREFIX}{version}"))
}

/// Whether `version` is already present in the store.
#[must_use]
pub fn is_installed(config: &SwitchConfig, version: &str) -> bool {
    path_exists(&installed_binary_path(config, version))
}

/// Points the active symlink at an already installed version.
///
/// Needs neither the network nor a supported host platform.
pub fn switch_to(config: &SwitchConfig, version: &str) -> Result<()> {
    check_bin_dir(config)?;

    let binary = installed_binary_path(config, version);
    if !path_exists(&binary) {
        return Err(HelmSwitchError::VersionNotFound {
            version: version.to_string(),
        })
        .with_context(|| format!("{} is not installed", binary.display()));
    }

    commit(config, version, &binary)
}

fn commit(config: &SwitchConfig, version: &str, binary: &Path) -> Result<()> {
    swap_symlink(binary, &config.bin_path)?;
    info!("Switched {} to helm {version}", config.bin_path.display());
    Ok(())
}

/// The directory holding the bin path must already exist.
fn check_bin_dir(config: &SwitchConfig) -> Result<()> {
    let parent = config
        .bin_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    if dir_exists(parent) {
        Ok(())
    } else {
        Err(HelmSwitchError::BinDirMissing {
            path: parent.display().to_string(),
        }
        .into())
    }
}
