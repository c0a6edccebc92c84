//! Batch apply behavior against a real filesystem.

use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;
use yamlfmt_diff::{FileDiff, FileDiffs, FormatDiff};

fn temp_root(temp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap()
}

fn planned(path: Utf8PathBuf, original: &str, formatted: &str) -> FileDiff {
    FileDiff::new(
        path,
        FormatDiff::new(original.into(), formatted.into(), ""),
    )
}

#[test]
fn test_apply_all_writes_every_changed_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp_root(&temp);
    let a = root.join("a.yaml");
    let b = root.join("b.yaml");
    fs::write(&a, "a:\n    b: 1").unwrap();
    fs::write(&b, "c:\n    d: 2").unwrap();

    let diffs: FileDiffs = vec![
        planned(a.clone(), "a:\n    b: 1", "a:\n  b: 1\n"),
        planned(b.clone(), "c:\n    d: 2", "c:\n  d: 2\n"),
    ]
    .into_iter()
    .collect();

    diffs.apply_all().unwrap();
    assert_eq!(fs::read_to_string(&a).unwrap(), "a:\n  b: 1\n");
    assert_eq!(fs::read_to_string(&b).unwrap(), "c:\n  d: 2\n");
}

#[test]
fn test_apply_all_attempts_every_write() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp_root(&temp);

    let good_first = root.join("first.yaml");
    let bad = root.join("missing-dir").join("bad.yaml");
    let good_last = root.join("last.yaml");
    fs::write(&good_first, "x:  1\n").unwrap();
    fs::write(&good_last, "y:  1\n").unwrap();

    let diffs: FileDiffs = vec![
        planned(good_first.clone(), "x:  1\n", "x: 1\n"),
        planned(bad.clone(), "z:  1\n", "z: 1\n"),
        planned(good_last.clone(), "y:  1\n", "y: 1\n"),
    ]
    .into_iter()
    .collect();

    let err = diffs.apply_all().unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.errors()[0].path, bad);
    assert!(err.to_string().contains("bad.yaml"));

    assert_eq!(fs::read_to_string(&good_first).unwrap(), "x: 1\n");
    assert_eq!(fs::read_to_string(&good_last).unwrap(), "y: 1\n");
    assert!(!bad.exists());
}

#[test]
fn test_apply_all_skips_unchanged_entries() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp_root(&temp);
    let path = root.join("clean.yaml");
    fs::write(&path, "a: 1\n").unwrap();
    let before = fs::metadata(&path).unwrap().modified().unwrap();

    let diffs: FileDiffs = vec![planned(path.clone(), "a: 1\n", "a: 1\n")]
        .into_iter()
        .collect();
    diffs.apply_all().unwrap();

    let after = fs::metadata(&path).unwrap().modified().unwrap();
    assert_eq!(before, after);
}
