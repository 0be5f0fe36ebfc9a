//! Binary smoke tests using assert_cmd.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{identity, write_fixture, write_identity_fixture};

fn cmd() -> Command {
    Command::cargo_bin("mat2json").unwrap()
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-dir"));
}

#[test]
fn converts_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_identity_fixture(dir.path(), "one.mat");
    let out_dir = dir.path().join("out");

    cmd()
        .arg(&input)
        .arg("--output-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted"))
        .stdout(predicate::str::contains("one.json"));

    assert!(out_dir.join("one.json").is_file());
}

#[test]
fn failed_file_still_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), "lonely.mat", vec![("g", identity())]);
    let out_dir = dir.path().join("out");

    cmd()
        .arg(&input)
        .args(["-o"])
        .arg(&out_dir)
        .assert()
        .success();

    assert!(!out_dir.join("lonely.json").exists());
}

#[test]
fn batch_prints_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("EFG7Program");
    std::fs::create_dir(&input_dir).unwrap();
    write_identity_fixture(&input_dir, "a.mat");
    std::fs::write(input_dir.join("b.mat"), b"garbage").unwrap();

    cmd()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 1/2 files successfully"));

    assert!(dir.path().join("data").join("a.json").is_file());
}

#[test]
fn empty_batch_directory_reports_no_files() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .args(["--input-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("No .mat files found"));
}

#[test]
fn missing_default_input_dir_exits_zero() {
    let dir = tempfile::tempdir().unwrap();

    cmd()
        .current_dir(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("No .mat files found in EFG7Program"));

    assert!(!dir.path().join("data").exists());
}

#[test]
fn failure_line_survives_silenced_logging() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.mat");
    std::fs::write(&input, b"garbage").unwrap();

    cmd()
        .env("MAT2JSON_LOG", "off")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Error converting"))
        .stderr(predicate::str::contains("broken.mat"));
}
