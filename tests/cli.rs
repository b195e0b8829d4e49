//! End-to-end CLI tests against the filesystem backend.

mod support;
use support::*;

use predicates::prelude::*;

#[test]
fn test_write_then_read() {
    let cli = Cli::new();
    assert_success(&cli.write("app", "db_password", "s3cr3t"));

    cli.cmd()
        .args(["read", "app", "db_password"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cr3t"))
        .stdout(predicate::str::contains(TEST_USER));
}

#[test]
fn test_write_reports_id() {
    let cli = Cli::new();
    let output = cli.write("app", "token", "t");
    assert_success(&output);
    assert!(stdout(&output).contains("wrote app/token"));
}

#[test]
fn test_read_quiet_prints_only_value() {
    let cli = Cli::new();
    assert_success(&cli.write("app", "token", "abc123"));

    cli.cmd()
        .args(["read", "app", "token", "--quiet"])
        .assert()
        .success()
        .stdout("abc123\n");
}

#[test]
fn test_read_specific_version() {
    let cli = Cli::new();
    assert_success(&cli.write("app", "token", "first"));
    assert_success(&cli.write("app", "token", "second"));

    cli.cmd()
        .args(["read", "app", "token", "--version", "1", "-q"])
        .assert()
        .success()
        .stdout("first\n");
    cli.cmd()
        .args(["read", "app", "token", "-q"])
        .assert()
        .success()
        .stdout("second\n");
}

#[test]
fn test_read_json() {
    let cli = Cli::new();
    assert_success(&cli.write("app", "token", "abc"));

    let output = cli
        .cmd()
        .args(["read", "app", "token", "--json"])
        .output()
        .unwrap();
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["value"], "abc");
    assert_eq!(json["meta"]["version"], 1);
    assert_eq!(json["meta"]["created_by"], TEST_USER);
}

#[test]
fn test_read_missing_fails_with_hint() {
    let cli = Cli::new();

    cli.cmd()
        .args(["read", "ghost", "nothing"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("secret not found: ghost/nothing"))
        .stderr(predicate::str::contains("coffer list"));
}

#[test]
fn test_list_hides_values_by_default() {
    let cli = Cli::new();
    assert_success(&cli.write("app", "a", "alpha-value"));
    assert_success(&cli.write("app", "b", "beta-value"));

    cli.cmd()
        .args(["list", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 secrets in app"))
        .stdout(predicate::str::contains("alpha-value").not());

    cli.cmd()
        .args(["list", "app", "--values"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha-value"));
}

#[test]
fn test_list_json() {
    let cli = Cli::new();
    assert_success(&cli.write("app", "a", "1"));
    assert_success(&cli.write("app", "a", "2"));

    let output = cli.cmd().args(["list", "app", "--json"]).output().unwrap();
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["meta"]["key"], "a");
    assert_eq!(entries[0]["meta"]["version"], 2);
    assert!(entries[0].get("value").is_none());
}

#[test]
fn test_export_raw_pairs() {
    let cli = Cli::new();
    assert_success(&cli.write("app", "A", "1"));
    assert_success(&cli.write("app", "B", "2"));

    let output = cli.cmd().args(["export", "app"]).output().unwrap();
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json, serde_json::json!({"A": "1", "B": "2"}));
}

#[test]
fn test_history_output() {
    let cli = Cli::new();
    assert_success(&cli.write("app", "token", "a"));
    assert_success(&cli.write("app", "token", "b"));

    cli.cmd()
        .args(["history", "app", "token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"))
        .stdout(predicate::str::contains("updated"));

    let output = cli
        .cmd()
        .args(["history", "app", "token", "--json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json[0]["type"], "created");
    assert_eq!(json[1]["type"], "updated");
    assert_eq!(json[1]["version"], 2);
}

#[test]
fn test_delete_then_read_fails() {
    let cli = Cli::new();
    assert_success(&cli.write("app", "token", "a"));

    cli.cmd()
        .args(["delete", "app", "token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted app/token"));

    let output = cli.cmd().args(["read", "app", "token"]).output().unwrap();
    assert_failure(&output);
    assert!(stderr(&output).contains("not found"));
}

#[test]
fn test_delete_missing_fails() {
    let cli = Cli::new();
    cli.cmd()
        .args(["delete", "ghost", "token"])
        .assert()
        .failure();
}

#[test]
fn test_reserved_key_rejected() {
    let cli = Cli::new();
    let output = cli.write("app", coffer::core::constants::METADATA_KEY, "x");
    assert_failure(&output);
    assert!(stderr(&output).contains("reserved"));
}

#[test]
fn test_verbose_flag_accepted() {
    let cli = Cli::new();
    cli.cmd()
        .args(["--verbose", "write", "app", "k", "v"])
        .assert()
        .success();
}

#[test]
fn test_unknown_backend_fails() {
    let cli = Cli::new();
    cli.cmd()
        .env("COFFER_BACKEND", "floppy")
        .args(["write", "app", "k", "v"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown backend 'floppy'"));
}

#[test]
fn test_blobs_land_under_configured_root() {
    let cli = Cli::new();
    assert_success(&cli.write("app", "k", "v"));
    assert!(cli.dir.path().join("blobs").join("app").join("CURRENT").exists());
}

#[test]
fn test_config_file_principal() {
    let cli = Cli::new();
    std::fs::write(
        cli.dir.path().join("coffer.toml"),
        "principal = \"from-file\"\n",
    )
    .unwrap();

    cli.cmd()
        .env_remove("COFFER_PRINCIPAL")
        .args(["write", "app", "k", "v"])
        .assert()
        .success();
    cli.cmd()
        .args(["read", "app", "k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from-file"));
}

#[test]
fn test_write_empty_value_reports_delete() {
    let cli = Cli::new();
    assert_success(&cli.write("app", "token", "a"));

    let output = cli.write("app", "token", "");
    assert_success(&output);
    assert!(stdout(&output).contains("deleted app/token"));
    assert!(!stdout(&output).contains("wrote"));

    let output = cli.cmd().args(["read", "app", "token"]).output().unwrap();
    assert_failure(&output);
}
