//! CLI contract tests.
//!
//! Every invocation points `$ROTARY_CONFIG_PATH` and the store paths into a
//! temp dir, so the tests never touch a real profile.

use assert_cmd::Command;
use tempfile::TempDir;

/// Binary with its environment isolated into `dir`.
fn rotary_in(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rotary").expect("binary should build");
    cmd.env("ROTARY_CONFIG_PATH", dir.path().join("absent.toml"))
        .env("ROTARY_CALL_LOG_DB", dir.path().join("calllog.db"))
        .env("ROTARY_CONTACTS_DB", dir.path().join("contacts.db"))
        .env("ROTARY_GRANT_LEDGER", dir.path().join("grants.toml"))
        .env("ROTARY_LOG_DIR", dir.path().join("logs"));
    cmd
}

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("stdout should be utf-8")
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().expect("temp dir");
    let assert = rotary_in(&dir).arg("--help").assert().success();

    let text = stdout_of(assert);
    assert!(text.contains("start"));
    assert!(text.contains("seed"));
    assert!(text.contains("paths"));
}

#[test]
fn paths_prints_resolved_locations() {
    let dir = TempDir::new().expect("temp dir");
    let assert = rotary_in(&dir).arg("paths").assert().success();

    let text = stdout_of(assert);
    assert!(text.contains("call log db:"));
    assert!(text.contains("calllog.db"));
    assert!(text.contains("grant ledger:"));
    assert!(text.contains("grants.toml"));
}

#[test]
fn seed_creates_both_stores() {
    let dir = TempDir::new().expect("temp dir");
    rotary_in(&dir).arg("seed").assert().success();

    assert!(dir.path().join("calllog.db").exists());
    assert!(dir.path().join("contacts.db").exists());
    // Without --grant-all the ledger stays untouched.
    assert!(!dir.path().join("grants.toml").exists());
}

#[test]
fn seed_grant_all_primes_the_ledger() {
    let dir = TempDir::new().expect("temp dir");
    rotary_in(&dir)
        .args(["seed", "--grant-all"])
        .assert()
        .success();

    let ledger = std::fs::read_to_string(dir.path().join("grants.toml"))
        .expect("ledger should exist");
    assert!(ledger.contains("read_call_log"));
    assert!(ledger.contains("read_contacts"));
    assert!(ledger.contains("place_call"));
}

#[test]
fn config_flag_overrides_store_paths() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("rotary.toml");
    let custom_db = dir.path().join("elsewhere.db");
    std::fs::write(
        &config_path,
        format!("[paths]\ncall_log_db = \"{}\"\n", custom_db.display()),
    )
    .expect("write config");

    let mut cmd = Command::cargo_bin("rotary").expect("binary should build");
    cmd.env_remove("ROTARY_CONFIG_PATH")
        .env_remove("ROTARY_CALL_LOG_DB");
    let assert = cmd
        .args(["--config", &config_path.display().to_string(), "paths"])
        .assert()
        .success();

    let text = stdout_of(assert);
    assert!(text.contains("elsewhere.db"));
}
