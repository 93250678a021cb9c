//! Helm release metadata from the GitHub releases API.
//!
//! [`ReleaseClient`] pages through `GET <releases_url>?per_page=100&page=N`
//! and returns the raw [`Release`] entries. [`version_list`] turns them into
//! the bare version strings offered to the user.
//!
//! Pagination stops at the first empty page or after the configured number
//! of pages, whichever comes first. Unauthenticated requests are subject to
//! GitHub's rate limit; a token from `GITHUB_TOKEN` or the config file is
//! sent as a bearer token when present.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::constants::RELEASES_PER_PAGE;
use crate::core::HelmSwitchError;
use crate::install::platform::Platform;
use crate::version::{from_release_tag, newest_first, to_release_tag, valid_version_format};

/// One downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// A GitHub release of Helm.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Release {
    /// Tag in `v1.2.3` form
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// The tag without its `v` prefix, if it has one.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        from_release_tag(&self.tag_name)
    }
}

/// Client for the releases endpoint.
pub struct ReleaseClient {
    client: reqwest::Client,
    releases_url: String,
    token: Option<String>,
    max_pages: u32,
}

impl ReleaseClient {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        releases_url: impl Into<String>,
        token: Option<String>,
        max_pages: u32,
    ) -> Self {
        Self {
            client,
            releases_url: releases_url.into(),
            token,
            max_pages: max_pages.max(1),
        }
    }

    /// Fetches all release entries, newest pages first.
    pub async fn fetch_releases(&self) -> Result<Vec<Release>> {
        let mut releases = Vec::new();

        for page in 1..=self.max_pages {
            let batch = self.fetch_page(page).await?;
            debug!("Release page {page}: {} entries", batch.len());
            let last_page = batch.len() < RELEASES_PER_PAGE as usize;
            releases.extend(batch);
            if last_page {
                break;
            }
        }

        info!("Fetched {} helm releases", releases.len());
        Ok(releases)
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<Release>> {
        let mut request = self
            .client
            .get(&self.releases_url)
            .query(&[("per_page", RELEASES_PER_PAGE), ("page", page)])
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| HelmSwitchError::NetworkError {
            operation: "fetching helm releases".to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HelmSwitchError::NetworkError {
                operation: "fetching helm releases".to_string(),
                reason: format!("HTTP {status} from {}", self.releases_url),
            }
            .into());
        }

        response
            .json::<Vec<Release>>()
            .await
            .with_context(|| format!("Failed to parse release list from {}", self.releases_url))
    }
}

/// Bare versions of all releases with a well-formed tag, newest first.
#[must_use]
pub fn version_list(releases: &[Release]) -> Vec<String> {
    let mut versions: Vec<String> = releases
        .iter()
        .filter_map(Release::version)
        .filter(|v| valid_version_format(v))
        .map(str::to_string)
        .collect();
    versions.sort_by(|a, b| newest_first(a, b));
    versions.dedup();
    versions
}

/// Finds the release tagged `v{version}`.
pub fn find_release<'a>(releases: &'a [Release], version: &str) -> Result<&'a Release, HelmSwitchError> {
    let tag = to_release_tag(version);
    releases.iter().find(|r| r.tag_name == tag).ok_or_else(|| HelmSwitchError::VersionNotFound {
        version: version.to_string(),
    })
}

/// Finds the asset for `platform` within `release`.
///
/// Matches the archive name exactly, or any sibling file that starts with it
/// followed by `.` (Helm attaches only signatures such as `.asc` to GitHub
/// releases and serves the archive itself from the download host).
pub fn find_asset<'a>(
    release: &'a Release,
    version: &str,
    platform: &Platform,
) -> Result<&'a ReleaseAsset, HelmSwitchError> {
    let expected = platform.asset_name(version);
    let sibling_prefix = format!("{expected}.");

    release
        .assets
        .iter()
        .find(|a| a.name == expected)
        .or_else(|| release.assets.iter().find(|a| a.name.starts_with(&sibling_prefix)))
        .ok_or_else(|| HelmSwitchError::NoMatchingAsset {
            version: version.to_string(),
            asset: expected,
        })
}
