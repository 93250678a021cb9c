use predicates::prelude::*;

use super::TestEnvironment;

#[test]
fn test_version_flag() {
    let env = TestEnvironment::new(None);
    env.command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("helmswitch"));
}

#[test]
fn test_help_lists_options() {
    let env = TestEnvironment::new(None);
    env.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--bin"))
        .stdout(predicate::str::contains("--skip-check"));
}

#[test]
fn test_non_semver_argument_prints_usage() {
    let env = TestEnvironment::new(None);
    env.command()
        .arg("latest")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid helm version: 'latest'"))
        .stdout(predicate::str::contains("Usage: helmswitch"));
    assert!(!env.bin_path.exists());
}

#[test]
fn test_switch_to_installed_version_offline() {
    let env = TestEnvironment::new(None);
    let binary = env.preinstall("3.13.3", "helm 3.13.3");

    env.command()
        .arg("3.13.3")
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched helm to version \"3.13.3\""));

    assert_eq!(std::fs::read_link(&env.bin_path).unwrap(), binary);
    assert_eq!(env.recent(), "3.13.3\n");
}

#[test]
fn test_bin_flag_overrides_config() {
    let env = TestEnvironment::new(None);
    env.preinstall("3.13.3", "helm 3.13.3");
    let custom = env.home.join("helm");

    env.command()
        .args(["--bin", custom.to_str().unwrap(), "3.13.3"])
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&custom).unwrap(), "helm 3.13.3");
    assert!(!env.bin_path.exists());
}

#[test]
fn test_missing_bin_dir_fails() {
    let env = TestEnvironment::new(None);
    env.preinstall("3.13.3", "helm 3.13.3");
    let missing = env.home.join("nowhere").join("helm");

    env.command()
        .args(["-b", missing.to_str().unwrap(), "3.13.3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_regular_file_at_bin_path_is_kept() {
    let env = TestEnvironment::new(None);
    env.preinstall("3.13.3", "helm 3.13.3");
    std::fs::write(&env.bin_path, "system helm").unwrap();

    env.command()
        .arg("3.13.3")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a symlink"));

    assert_eq!(env.active_content(), "system helm");
}

#[test]
fn test_invalid_config_file_fails() {
    let env = TestEnvironment::new(None);
    std::fs::write(&env.config_path, "not_a_key = 1\n").unwrap();

    env.command()
        .arg("3.13.3")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_non_ascii_digits_print_usage() {
    let env = TestEnvironment::new(None);
    env.command()
        .arg("١.٢.٣")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: helmswitch"));
    assert!(!env.bin_path.exists());
}

#[test]
fn test_undecodable_recent_file_is_reset() {
    let env = TestEnvironment::new(None);
    env.preinstall("3.13.3", "helm 3.13.3");
    std::fs::write(env.store_dir.join("RECENT"), b"3.12.0\n\xff\xfe\n").unwrap();

    env.command().arg("3.13.3").assert().success();

    assert_eq!(env.recent(), "3.13.3\n");
}
