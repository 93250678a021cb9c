//! End-to-end tests driving the `helmswitch` binary.
//!
//! Each test gets an isolated home directory, version store and bin
//! directory, plus a config file pointing both the releases API and the
//! download host at a local [`TestServer`].

#![cfg(unix)]

mod cli;
mod install;

use assert_cmd::Command;
use helmswitch::config::GlobalConfig;
use helmswitch::install::Platform;
use helmswitch::test_utils::{TestServer, helm_archive, releases_json, sha256_hex};
use std::path::PathBuf;
use tempfile::TempDir;

/// Nothing listens on the discard port, so stray requests fail fast.
const UNREACHABLE: &str = "http://127.0.0.1:9";

pub struct TestEnvironment {
    _temp: TempDir,
    pub home: PathBuf,
    pub store_dir: PathBuf,
    pub bin_path: PathBuf,
    pub config_path: PathBuf,
}

impl TestEnvironment {
    /// An environment whose endpoints are served by `server`, or unreachable.
    pub fn new(server: Option<&TestServer>) -> Self {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let bin_dir = temp.path().join("bin");
        std::fs::create_dir_all(&home).unwrap();
        std::fs::create_dir_all(&bin_dir).unwrap();

        let base = server.map_or_else(|| UNREACHABLE.to_string(), TestServer::url);
        let store_dir = home.join(".helm.versions");
        let bin_path = bin_dir.join("helm");
        let config = GlobalConfig {
            bin_path: Some(bin_path.display().to_string()),
            store_dir: Some(store_dir.display().to_string()),
            releases_url: format!("{base}/releases"),
            download_base_url: base,
            timeout_secs: 10,
            ..GlobalConfig::default()
        };
        let config_path = temp.path().join("config.toml");
        std::fs::write(&config_path, toml::to_string(&config).unwrap()).unwrap();

        Self {
            _temp: temp,
            home,
            store_dir,
            bin_path,
            config_path,
        }
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("helmswitch").unwrap();
        cmd.env("HOME", &self.home)
            .env("HELMSWITCH_CONFIG", &self.config_path)
            .env("HELMSWITCH_NO_PROGRESS", "1")
            .env("NO_PROXY", "127.0.0.1,localhost")
            .env("no_proxy", "127.0.0.1,localhost")
            .env_remove("RUST_LOG")
            .env_remove("GITHUB_TOKEN");
        cmd
    }

    /// Places a fake installed version in the store.
    pub fn preinstall(&self, version: &str, content: &str) -> PathBuf {
        std::fs::create_dir_all(&self.store_dir).unwrap();
        let path = self.store_dir.join(format!("helm_{version}"));
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn active_content(&self) -> String {
        std::fs::read_to_string(&self.bin_path).unwrap()
    }

    pub fn recent(&self) -> String {
        std::fs::read_to_string(self.store_dir.join("RECENT")).unwrap_or_default()
    }
}

/// Serves the host's archive and sidecar for `version` on the download host.
pub fn publish_archive(server: &TestServer, version: &str, binary: &[u8]) {
    let platform = Platform::detect().unwrap();
    let archive = helm_archive(&platform.to_string(), binary);
    let name = platform.asset_name(version);
    server.route(&format!("/{name}.sha256"), 200, sha256_hex(&archive));
    server.route(&format!("/{name}"), 200, archive);
}

/// Serves a single release page listing `versions` with signature assets
/// for the host platform.
pub fn publish_releases(server: &TestServer, versions: &[&str]) {
    let platform = Platform::detect().unwrap();
    let tags: Vec<(String, String)> = versions
        .iter()
        .map(|v| (format!("v{v}"), format!("{}.asc", platform.asset_name(v))))
        .collect();
    let assets: Vec<[&str; 1]> = tags.iter().map(|(_, a)| [a.as_str()]).collect();
    let entries: Vec<(&str, &[&str])> =
        tags.iter().zip(&assets).map(|((tag, _), a)| (tag.as_str(), &a[..])).collect();
    server.route("/releases?per_page=100&page=1", 200, releases_json(&entries));
}
