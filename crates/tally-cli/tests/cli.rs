use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const UNSET_KEY: &str = "TALLY_CLI_TEST_KEY_NEVER_SET";

/// Config that points the extractor at an API key variable nobody sets.
fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.json");
    fs::write(
        &path,
        format!(r#"{{ "extraction": {{ "api_key_env": "{UNSET_KEY}", "base_url": "http://127.0.0.1:9" }} }}"#),
    )
    .unwrap();
    path
}

fn tally() -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn empty_directory_reports_zero() {
    let work = tempfile::tempdir().unwrap();
    let receipts = work.path().join("receipts");
    fs::create_dir(&receipts).unwrap();
    let config = write_config(work.path());

    tally()
        .current_dir(work.path())
        .arg(&receipts)
        .arg("--config")
        .arg(&config)
        .args(["--print", "--expenses", "2024-01-01", "2024-12-31", "--plot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("{}"))
        .stdout(predicate::str::contains(
            "Total expenses from 2024-01-01 to 2024-12-31: $0.00",
        ))
        .stdout(predicate::str::contains("No valid data to plot."));

    assert!(!work.path().join("expenses_by_category.png").exists());
}

#[test]
fn invalid_range_is_zero_not_an_error() {
    let work = tempfile::tempdir().unwrap();
    let config = write_config(work.path());
    let receipts = work.path().join("receipts");
    fs::create_dir(&receipts).unwrap();

    tally()
        .arg(&receipts)
        .arg("--config")
        .arg(&config)
        .args(["--expenses", "yesterday", "2024-12-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Total expenses from yesterday to 2024-12-31: $0.00",
        ));
}

#[test]
fn missing_directory_fails() {
    let work = tempfile::tempdir().unwrap();
    let config = write_config(work.path());

    tally()
        .arg(work.path().join("does-not-exist"))
        .arg("--config")
        .arg(&config)
        .arg("--print")
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading directory"));
}

#[test]
fn missing_api_key_aborts_run() {
    let work = tempfile::tempdir().unwrap();
    let config = write_config(work.path());
    let receipts = work.path().join("receipts");
    fs::create_dir(&receipts).unwrap();
    fs::write(receipts.join("lunch.jpg"), b"\xff\xd8\xff").unwrap();

    tally()
        .env_remove(UNSET_KEY)
        .arg(&receipts)
        .arg("--config")
        .arg(&config)
        .arg("--print")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("lunch.jpg"))
        .stderr(predicate::str::contains(UNSET_KEY));
}

#[test]
fn expenses_needs_two_dates() {
    let work = tempfile::tempdir().unwrap();

    tally()
        .arg(work.path())
        .args(["--expenses", "2024-01-01"])
        .assert()
        .failure();
}

#[test]
fn malformed_config_fails() {
    let work = tempfile::tempdir().unwrap();
    let config = work.path().join("config.json");
    fs::write(&config, "{ not json").unwrap();

    tally()
        .arg(work.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading config"));
}

#[test]
fn help_lists_report_flags() {
    tally()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--print"))
        .stdout(predicate::str::contains("--expenses"))
        .stdout(predicate::str::contains("--plot"));
}
