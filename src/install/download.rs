//! HTTP downloads into the version store.
//!
//! The local file name is the last path segment of the URL, so an artifact
//! and its checksum sidecar (`<artifact-url>.sha256`) land side by side and
//! differ only by the `.sha256` suffix.
//!
//! Bodies are streamed into `<name>.part` and renamed once complete. A
//! failed request never leaves a file under the final name.

use anyhow::{Context, Result};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::constants::CONNECT_TIMEOUT;
use crate::core::HelmSwitchError;
use crate::utils::fs::{ensure_dir, remove_file_if_exists};
use crate::utils::progress::ProgressBar;

/// Builds the HTTP client used for releases and downloads.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("helmswitch/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

/// Returns the final path segment of `url`.
///
/// # Examples
///
/// ```rust
/// use helmswitch::install::download::file_name_from_url;
///
/// let name = file_name_from_url("https://get.helm.sh/helm-v3.14.0-linux-amd64.tar.gz.sha256").unwrap();
/// assert_eq!(name, "helm-v3.14.0-linux-amd64.tar.gz.sha256");
/// ```
pub fn file_name_from_url(url: &str) -> Result<String> {
    let parsed = reqwest::Url::parse(url).with_context(|| format!("Invalid download URL: {url}"))?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Download URL has no file name: {url}"))
}

/// Streams URLs to files.
#[derive(Clone)]
pub struct Downloader {
    client: reqwest::Client,
    show_progress: bool,
}

impl Downloader {
    #[must_use]
    pub const fn new(client: reqwest::Client, show_progress: bool) -> Self {
        Self {
            client,
            show_progress,
        }
    }

    /// Fetches `url` into `dest_dir` and returns the written path.
    ///
    /// Non-success responses fail with [`HelmSwitchError::DownloadFailed`];
    /// transport failures with [`HelmSwitchError::NetworkError`].
    pub async fn download_from_url(&self, dest_dir: &Path, url: &str) -> Result<PathBuf> {
        let file_name = file_name_from_url(url)?;
        ensure_dir(dest_dir)?;

        let dest = dest_dir.join(&file_name);
        let partial = dest_dir.join(format!("{file_name}.part"));

        info!("Downloading {url}");
        match self.fetch(url, &file_name, &partial).await {
            Ok(bytes) => {
                tokio::fs::rename(&partial, &dest).await.with_context(|| {
                    format!("Failed to rename {} to {}", partial.display(), dest.display())
                })?;
                debug!("Downloaded {bytes} bytes to {}", dest.display());
                Ok(dest)
            }
            Err(e) => {
                remove_file_if_exists(&partial)?;
                Err(e)
            }
        }
    }

    async fn fetch(&self, url: &str, label: &str, partial: &Path) -> Result<u64> {
        let response = self.client.get(url).send().await.map_err(|e| HelmSwitchError::NetworkError {
            operation: format!("GET {url}"),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HelmSwitchError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let progress = ProgressBar::for_download(response.content_length(), !self.show_progress);
        progress.set_message(label);

        let mut file = tokio::fs::File::create(partial)
            .await
            .with_context(|| format!("Failed to create file: {}", partial.display()))?;

        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| HelmSwitchError::NetworkError {
                operation: format!("reading {url}"),
                reason: e.to_string(),
            })?;
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write to {}", partial.display()))?;
            written += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }

        file.flush().await.with_context(|| format!("Failed to flush {}", partial.display()))?;
        file.sync_all().await.with_context(|| format!("Failed to sync {}", partial.display()))?;
        progress.finish_and_clear();

        Ok(written)
    }
}
