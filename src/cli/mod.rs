//! Command-line interface for helmswitch.
//!
//! ```bash
//! # Switch to (installing if needed) a specific version
//! helmswitch 3.14.0
//!
//! # Pick from recently used and published versions
//! helmswitch
//!
//! # Use a custom symlink location and skip the release lookup
//! helmswitch --bin ~/bin/helm --skip-check 3.14.0
//! ```
//!
//! A version that is already in the store is switched to without touching
//! the network. Otherwise the release list decides whether the version
//! exists, unless `--skip-check` is given, in which case the archive is
//! fetched straight from the download host.

pub mod menu;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{GlobalConfig, SwitchConfig};
use crate::core::HelmSwitchError;
use crate::install::{self, Installer};
use crate::install::download::http_client;
use crate::recent::{add_recent, get_recent_versions, remove_duplicates, version_exists};
use crate::release::{Release, ReleaseClient, version_list};
use crate::utils::fs::ensure_dir;
use crate::utils::progress::ProgressBar;
use crate::version::is_bare_version;

/// Runtime settings derived from the global flags.
///
/// Kept separate from [`Cli`] so tests and embedders can drive
/// [`Cli::execute_with_config`] without touching process state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Explicit log filter. `None` defers to `RUST_LOG`, falling back to `warn`.
    pub log_level: Option<String>,

    /// Disable progress bars and spinners.
    pub no_progress: bool,

    /// Config file to load instead of the default location.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn env_filter(&self) -> EnvFilter {
        match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        }
    }

    /// Installs the global tracing subscriber, writing to stderr.
    ///
    /// Does nothing if a subscriber is already set.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Switch between Helm versions.
#[derive(Parser, Debug)]
#[command(
    name = "helmswitch",
    about = "Switch between Helm versions",
    version,
    long_about = "Downloads, verifies and installs Helm release binaries into a local version store and points a `helm` symlink at the selected version."
)]
pub struct Cli {
    /// Version to switch to, e.g. 3.14.0. Omit to choose from a list.
    #[arg(value_name = "VERSION")]
    pub target_version: Option<String>,

    /// Location of the helm symlink
    #[arg(short, long, value_name = "PATH")]
    pub bin: Option<String>,

    /// Download from the download host without checking the release list
    #[arg(short, long)]
    pub skip_check: bool,

    /// Path to the config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable progress bars
    #[arg(long, env = "HELMSWITCH_NO_PROGRESS")]
    pub no_progress: bool,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translates the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("off".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, cli_config: CliConfig) -> Result<()> {
        cli_config.init_logging();

        let global = GlobalConfig::load_with_optional(cli_config.config_path.clone()).await?;
        let config =
            SwitchConfig::resolve(&global, self.bin.as_deref(), !cli_config.no_progress)?;
        ensure_dir(&config.store_dir)?;

        match self.target_version.as_deref() {
            Some(version) if is_bare_version(version) => {
                switch_version(&config, version, self.skip_check).await
            }
            Some(version) => {
                print_usage(version);
                Ok(())
            }
            None => select_and_switch(&config).await,
        }
    }
}

async fn switch_version(config: &SwitchConfig, version: &str, skip_check: bool) -> Result<()> {
    if install::is_installed(config, version) {
        debug!("helm {version} already installed");
        install::switch_to(config, version)?;
        return finish(config, version);
    }

    let installer = Installer::for_host(config)?;
    if skip_check {
        installer.install_direct(version).await?;
    } else {
        let releases = fetch_releases(config).await?;
        if !version_exists(version, &version_list(&releases)) {
            println!("{}", "Not a valid helm version".yellow());
            return Ok(());
        }
        installer.install(version, &releases).await?;
    }

    finish(config, version)
}

async fn select_and_switch(config: &SwitchConfig) -> Result<()> {
    let releases = fetch_releases(config).await?;

    let recent = get_recent_versions(&config.store_dir)?;
    let versions = remove_duplicates(recent.iter().cloned().chain(version_list(&releases)).collect());

    let version = {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        menu::select_version(&versions, &recent, &mut stdin.lock(), &mut stdout.lock())?
    };

    if install::is_installed(config, &version) {
        install::switch_to(config, &version)?;
    } else {
        Installer::for_host(config)?.install(&version, &releases).await?;
    }

    finish(config, &version)
}

async fn fetch_releases(config: &SwitchConfig) -> Result<Vec<Release>> {
    let spinner = ProgressBar::for_download(None, !config.show_progress);
    spinner.set_message("Fetching helm releases");

    let client = ReleaseClient::new(
        http_client(config.timeout)?,
        &config.releases_url,
        config.github_token.clone(),
        config.release_pages,
    );
    let result = client.fetch_releases().await;
    spinner.finish_and_clear();
    result
}

fn finish(config: &SwitchConfig, version: &str) -> Result<()> {
    add_recent(version, &config.store_dir)?;
    println!("{} {}", "Switched helm to version".green(), format!("\"{version}\"").bold());
    Ok(())
}

fn print_usage(version: &str) {
    let error = HelmSwitchError::InvalidVersion {
        version: version.to_string(),
    };
    println!("{}", error.to_string().yellow());
    println!("Usage: helmswitch [VERSION]   e.g. helmswitch 3.14.0");
    println!("Run without arguments to choose from a list of versions.");
}
