//! End-to-end tests for the keysort binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn keysort() -> Command {
    Command::cargo_bin("keysort").unwrap()
}

#[test]
fn no_paths_is_a_successful_no_op() {
    keysort().assert().success();
}

#[test]
fn rewrites_file_and_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("module.py");
    fs::write(&path, "x = {'b': 1, 'a': 2}\n").unwrap();

    keysort()
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Fixed"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "x = {'a': 2, 'b': 1}\n");
}

#[test]
fn second_run_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("module.py");
    fs::write(&path, "x = {'b': 1, 'a': 2}\n").unwrap();

    keysort().arg(&path).assert().code(1);
    keysort()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed").not());
}

#[test]
fn check_mode_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("module.py");
    let src = "x = {'b': 1, 'a': 2}\n";
    fs::write(&path, src).unwrap();

    keysort()
        .arg("--check")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Would fix"));
    assert_eq!(fs::read_to_string(&path).unwrap(), src);
}

#[test]
fn diff_mode_prints_patch_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("module.py");
    let src = "x = {'b': 1, 'a': 2}\n";
    fs::write(&path, src).unwrap();

    keysort()
        .arg("--diff")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("-x = {'b': 1, 'a': 2}"))
        .stdout(predicate::str::contains("+x = {'a': 2, 'b': 1}"));
    assert_eq!(fs::read_to_string(&path).unwrap(), src);
}

#[test]
fn non_python_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    let src = "x = {'b': 1, 'a': 2}\n";
    fs::write(&path, src).unwrap();

    keysort().arg(&path).assert().success();
    assert_eq!(fs::read_to_string(&path).unwrap(), src);
}

#[test]
fn errors_do_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.py");
    let good = dir.path().join("good.py");
    fs::write(&bad, "x = {'a': 1\n").unwrap();
    fs::write(&good, "x = {'b': 1, 'a': 2}\n").unwrap();

    keysort()
        .arg(&bad)
        .arg(&good)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("parse error"));
    // the valid file must still have been fixed
    assert_eq!(fs::read_to_string(&good).unwrap(), "x = {'a': 2, 'b': 1}\n");
    assert_eq!(fs::read_to_string(&bad).unwrap(), "x = {'a': 1\n");
}

#[test]
fn directories_are_walked_recursively() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("pkg")).unwrap();
    let top = dir.path().join("top.py");
    let inner = dir.path().join("pkg/inner.py");
    fs::write(&top, "x = {'b': 1, 'a': 2}\n").unwrap();
    fs::write(&inner, "y = {'d': 1, 'c': 2}\n").unwrap();

    keysort().arg(dir.path()).assert().code(1);
    assert_eq!(fs::read_to_string(&top).unwrap(), "x = {'a': 2, 'b': 1}\n");
    assert_eq!(fs::read_to_string(&inner).unwrap(), "y = {'c': 2, 'd': 1}\n");
}

#[test]
fn json_report_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("module.py");
    fs::write(&path, "x = {'b': 1, 'a': 2}\n").unwrap();

    keysort()
        .arg("--check")
        .args(["--output-format", "json"])
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"status\": \"changed\""))
        .stdout(predicate::str::contains("\"changed\": 1"))
        .stdout(predicate::str::contains("\"errors\": 0"));
}

#[test]
fn unknown_sorting_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("module.py");
    fs::write(&path, "x = 1\n").unwrap();

    keysort()
        .args(["--sorting", "beta"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
