use predicates::prelude::*;

use super::{TestEnvironment, publish_archive, publish_releases};
use helmswitch::install::Platform;
use helmswitch::test_utils::{TestServer, helm_archive, sha256_hex};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_install_listed_version() {
    let server = TestServer::start().await;
    publish_releases(&server, &["3.14.0", "3.13.3"]);
    publish_archive(&server, "3.14.0", b"helm 3.14.0");
    let env = TestEnvironment::new(Some(&server));

    env.command()
        .arg("3.14.0")
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched helm to version \"3.14.0\""));

    assert_eq!(env.active_content(), "helm 3.14.0");
    assert_eq!(env.recent(), "3.14.0\n");

    let mut entries: Vec<String> = std::fs::read_dir(&env.store_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["RECENT", "helm_3.14.0"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unlisted_version_is_rejected() {
    let server = TestServer::start().await;
    publish_releases(&server, &["3.14.0"]);
    let env = TestEnvironment::new(Some(&server));

    env.command()
        .arg("9.9.9")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not a valid helm version"));

    assert!(!env.bin_path.exists());
    assert!(!env.store_dir.join("helm_9.9.9").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_skip_check_downloads_directly() {
    let server = TestServer::start().await;
    publish_archive(&server, "3.12.1", b"helm 3.12.1");
    let env = TestEnvironment::new(Some(&server));

    env.command().args(["--skip-check", "3.12.1"]).assert().success();

    assert_eq!(env.active_content(), "helm 3.12.1");
    assert_eq!(server.hits("/releases?per_page=100&page=1"), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_checksum_mismatch_keeps_active_version() {
    let server = TestServer::start().await;
    let platform = Platform::detect().unwrap();
    let name = platform.asset_name("3.14.0");
    server.route(&format!("/{name}"), 200, helm_archive(&platform.to_string(), b"tampered"));
    server.route(&format!("/{name}.sha256"), 200, sha256_hex(b"original"));
    let env = TestEnvironment::new(Some(&server));
    env.preinstall("3.13.3", "helm 3.13.3");
    env.command().arg("3.13.3").assert().success();

    env.command()
        .args(["-s", "3.14.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Checksum mismatch"));

    assert_eq!(env.active_content(), "helm 3.13.3");
    assert!(!env.store_dir.join("helm_3.14.0").exists());
    assert!(!env.store_dir.join(&name).exists());
    assert_eq!(env.recent(), "3.13.3\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_menu_selection_installs_choice() {
    let server = TestServer::start().await;
    publish_releases(&server, &["3.14.0", "3.13.3"]);
    publish_archive(&server, "3.13.3", b"helm 3.13.3");
    let env = TestEnvironment::new(Some(&server));

    env.command()
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1) 3.14.0"))
        .stdout(predicate::str::contains("Switched helm to version \"3.13.3\""));

    assert_eq!(env.active_content(), "helm 3.13.3");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_menu_lists_recent_first() {
    let server = TestServer::start().await;
    publish_releases(&server, &["3.14.0", "3.13.3"]);
    let env = TestEnvironment::new(Some(&server));
    env.preinstall("3.12.1", "helm 3.12.1");
    std::fs::write(env.store_dir.join("RECENT"), "3.12.1\n").unwrap();

    env.command()
        .write_stdin("1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1) 3.12.1"))
        .stdout(predicate::str::contains("Switched helm to version \"3.12.1\""));

    assert_eq!(env.active_content(), "helm 3.12.1");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_menu_cancelled_on_eof() {
    let server = TestServer::start().await;
    publish_releases(&server, &["3.14.0"]);
    let env = TestEnvironment::new(Some(&server));

    env.command()
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Version selection cancelled"));

    assert!(!env.bin_path.exists());
}
