use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

const LEGACY: &str = "import XCTest\n\nfinal class FooTests: XCTestCase {\n    func testBar() {\n        XCTAssertTrue(flag)\n    }\n}\n";

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("xctest-migrate"))
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn file_is_migrated_in_place() {
    let dir = tempdir().expect("tempdir");
    let input = write(dir.path(), "FooTests.swift", LEGACY);

    cmd()
        .arg("--file")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully migrated"));

    let migrated = fs::read_to_string(&input).expect("read output");
    assert!(migrated.contains("import Testing"));
    assert!(migrated.contains("@Test\n    func bar()"));
}

#[test]
fn output_flag_leaves_input_alone() {
    let dir = tempdir().expect("tempdir");
    let input = write(dir.path(), "FooTests.swift", LEGACY);
    let output = dir.path().join("Out.swift");

    cmd()
        .arg("-f")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&input).expect("read input"), LEGACY);
    assert!(fs::read_to_string(&output)
        .expect("read output")
        .contains("struct FooTests {"));
}

#[test]
fn backup_keeps_the_original_text() {
    let dir = tempdir().expect("tempdir");
    let input = write(dir.path(), "FooTests.swift", LEGACY);

    cmd().arg("-f").arg(&input).arg("--backup").assert().success();

    let backup = dir.path().join("FooTests.swift.backup");
    assert_eq!(fs::read_to_string(backup).expect("read backup"), LEGACY);
}

#[test]
fn backup_onto_the_input_is_refused() {
    let dir = tempdir().expect("tempdir");
    let input = write(dir.path(), "FooTests.swift.backup", LEGACY);
    write(dir.path(), "FooTests.swift", "// existing\n");

    cmd()
        .arg("-f")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("FooTests.swift"))
        .arg("--backup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite"));

    assert_eq!(fs::read_to_string(&input).expect("read input"), LEGACY);
}

#[test]
fn dry_run_prints_without_writing() {
    let dir = tempdir().expect("tempdir");
    let input = write(dir.path(), "FooTests.swift", LEGACY);

    cmd()
        .arg("-f")
        .arg(&input)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("#expect(flag == true)"));

    assert_eq!(fs::read_to_string(&input).expect("read input"), LEGACY);
}

#[test]
fn unsupported_file_fails_with_hint() {
    cmd()
        .arg("-f")
        .arg(fixture("fixtures/expectation_tests.swift"))
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported pattern"))
        .stderr(predicate::str::contains("manual migration"));
}

#[test]
fn missing_file_is_an_error() {
    cmd()
        .arg("-f")
        .arg("does/not/exist.swift")
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn file_or_folder_is_required() {
    cmd().assert().failure();
}

#[test]
fn folder_summary_counts_each_outcome() {
    let dir = tempdir().expect("tempdir");
    write(dir.path(), "FooTests.swift", LEGACY);
    write(dir.path(), "Plain.swift", "struct Point {}\n");
    fs::copy(
        fixture("fixtures/expectation_tests.swift"),
        dir.path().join("Waits.swift"),
    )
    .expect("copy fixture");

    cmd()
        .arg("--folder")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted:"))
        .stdout(predicate::str::contains("Already migrated:"))
        .stdout(predicate::str::contains("Unsupported:"))
        .stdout(predicate::str::contains(
            "Summary: 1 converted, 1 already migrated, 1 unsupported",
        ));
}

#[test]
fn folder_json_summary() {
    let dir = tempdir().expect("tempdir");
    let input = write(dir.path(), "FooTests.swift", LEGACY);

    let output = cmd()
        .arg("--folder")
        .arg(dir.path())
        .arg("--format")
        .arg("json")
        .arg("--dry-run")
        .output()
        .expect("run");
    assert!(output.status.success());

    let summary: Value = serde_json::from_slice(&output.stdout).expect("json summary");
    assert_eq!(summary["converted"], 1);
    assert_eq!(summary["dry_run"], true);
    assert_eq!(summary["files"][0]["status"], "converted");
    assert_eq!(fs::read_to_string(&input).expect("read input"), LEGACY);
}

#[test]
fn config_file_overrides_target_module() {
    let dir = tempdir().expect("tempdir");
    let input = write(dir.path(), "FooTests.swift", LEGACY);
    let config = write(
        dir.path(),
        "migrate.toml",
        "[modern]\nmodule = \"ModernTesting\"\n",
    );

    cmd()
        .arg("-f")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("import ModernTesting"));
}
