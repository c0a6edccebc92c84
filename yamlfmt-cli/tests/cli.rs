//! End-to-end tests of the `yamlfmt` binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn yamlfmt() -> Command {
    Command::cargo_bin("yamlfmt").expect("yamlfmt binary")
}

fn create_temp_tree() -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    let root = td.path();

    fs::create_dir_all(root.join("deploy")).unwrap();
    fs::write(root.join("clean.yaml"), "a:\n  b: 1\n").unwrap();
    fs::write(root.join("messy.yaml"), "a:\n    b: 1\n").unwrap();
    fs::write(root.join("deploy").join("svc.yml"), "items:\n    - x\n").unwrap();
    fs::write(root.join("notes.txt"), "not:\n      yaml\n").unwrap();

    td
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_format_rewrites_unformatted_files() {
    let temp = create_temp_tree();

    yamlfmt().current_dir(temp.path()).assert().success();

    assert_eq!(read(temp.path().join("messy.yaml")), "a:\n  b: 1\n");
    assert_eq!(read(temp.path().join("deploy/svc.yml")), "items:\n  - x\n");
    assert_eq!(read(temp.path().join("notes.txt")), "not:\n      yaml\n");
}

#[test]
fn test_lint_fails_on_differences_without_writing() {
    let temp = create_temp_tree();

    yamlfmt()
        .current_dir(temp.path())
        .arg("--lint")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "The following formatting differences were found:",
        ))
        .stdout(predicate::str::contains("messy.yaml:"))
        .stdout(predicate::str::contains("+  b: 1"));

    assert_eq!(read(temp.path().join("messy.yaml")), "a:\n    b: 1\n");
}

#[test]
fn test_lint_passes_on_clean_file() {
    let temp = create_temp_tree();

    yamlfmt()
        .current_dir(temp.path())
        .args(["--lint", "clean.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_dry_run_quiet_lists_paths() {
    let temp = create_temp_tree();

    yamlfmt()
        .current_dir(temp.path())
        .args(["--dry", "--quiet", "messy.yaml", "clean.yaml"])
        .assert()
        .success()
        .stdout("The following files would be formatted:\n\nmessy.yaml\n\n");

    assert_eq!(read(temp.path().join("messy.yaml")), "a:\n    b: 1\n");
}

#[test]
fn test_stdin_is_formatted_to_stdout() {
    yamlfmt()
        .arg("--in")
        .write_stdin("a:\n    b: 1")
        .assert()
        .success()
        .stdout("a:\n  b: 1\n");
}

#[test]
fn test_formatter_flag_overrides_indent() {
    yamlfmt()
        .args(["--in", "--formatter", "indent=4"])
        .write_stdin("a:\n  b: 1\n")
        .assert()
        .success()
        .stdout("a:\n    b: 1\n");
}

#[test]
fn test_config_file_is_discovered() {
    let temp = create_temp_tree();
    fs::write(
        temp.path().join("yamlfmt.toml"),
        "[formatter]\nindent = 4\n\n[paths]\nexclude = [\"deploy/**\"]\n",
    )
    .unwrap();

    yamlfmt().current_dir(temp.path()).assert().success();

    assert_eq!(read(temp.path().join("messy.yaml")), "a:\n    b: 1\n");
    assert_eq!(read(temp.path().join("clean.yaml")), "a:\n    b: 1\n");
    assert_eq!(read(temp.path().join("deploy/svc.yml")), "items:\n    - x\n");
}

#[test]
fn test_explicit_config_path() {
    let temp = create_temp_tree();
    let conf = temp.path().join("custom.toml");
    fs::write(&conf, "[engine]\nline_ending = \"crlf\"\n").unwrap();

    yamlfmt()
        .current_dir(temp.path())
        .arg("--conf")
        .arg(&conf)
        .arg("messy.yaml")
        .assert()
        .success();

    assert_eq!(read(temp.path().join("messy.yaml")), "a:\r\n  b: 1\r\n");
}

#[test]
fn test_lint_reports_line_ending_change() {
    let temp = create_temp_tree();

    yamlfmt()
        .current_dir(temp.path())
        .args(["--lint", "--line-ending", "crlf", "clean.yaml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("clean.yaml:\nline endings: lf -> crlf\n"));

    assert_eq!(read(temp.path().join("clean.yaml")), "a:\n  b: 1\n");
}

#[test]
fn test_missing_config_is_usage_error() {
    let temp = create_temp_tree();

    yamlfmt()
        .current_dir(temp.path())
        .args(["--conf", "nope.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope.toml"));
}

#[test]
fn test_unknown_formatter_type_is_usage_error() {
    yamlfmt()
        .args(["--in", "--formatter", "type=pretty"])
        .write_stdin("a: 1\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown formatter type 'pretty'"));
}

#[test]
fn test_invalid_formatter_setting_is_usage_error() {
    yamlfmt()
        .args(["--in", "--formatter", "indent=0"])
        .write_stdin("a: 1\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("indent"));
}

#[test]
fn test_conflicting_modes_are_rejected() {
    yamlfmt()
        .args(["--lint", "--dry"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_missing_file_is_reported_and_others_processed() {
    let temp = create_temp_tree();

    yamlfmt()
        .current_dir(temp.path())
        .args(["missing.yaml", "messy.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.yaml"));

    assert_eq!(read(temp.path().join("messy.yaml")), "a:\n  b: 1\n");
}

#[test]
fn test_schema_violation_blocks_formatting() {
    let temp = create_temp_tree();
    fs::write(
        temp.path().join("schema.json"),
        r#"{"type": "object", "required": ["name"]}"#,
    )
    .unwrap();
    fs::write(
        temp.path().join("yamlfmt.toml"),
        "[[schemas]]\nurl = \"schema.json\"\nmatch = \"messy.yaml\"\n",
    )
    .unwrap();

    yamlfmt()
        .current_dir(temp.path())
        .arg("messy.yaml")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not conform"));

    assert_eq!(read(temp.path().join("messy.yaml")), "a:\n    b: 1\n");
}

#[test]
fn test_json_output_summarizes_lint() {
    let temp = create_temp_tree();

    let output = yamlfmt()
        .current_dir(temp.path())
        .args(["--lint", "--output-format", "json", "clean.yaml", "messy.yaml"])
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["mode"], "lint");
    assert_eq!(summary["processed"], 2);
    assert_eq!(summary["changed_count"], 1);
    assert_eq!(summary["changed"], serde_json::json!(["messy.yaml"]));
    assert_eq!(summary["errors"], serde_json::json!([]));
}

#[test]
fn test_list_formatters_shows_defaults() {
    yamlfmt()
        .arg("list-formatters")
        .assert()
        .success()
        .stdout(predicate::str::contains("basic\n"))
        .stdout(predicate::str::contains("  indent = 2"))
        .stdout(predicate::str::contains("experimental\n"));
}

#[test]
fn test_list_formatters_json() {
    let output = yamlfmt()
        .args(["list-formatters", "--output-format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let formatters: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(formatters["basic"]["type"], "basic");
    assert_eq!(formatters["basic"]["indent"], 2);
    assert_eq!(formatters["experimental"]["retain_header_comments"], true);
}
