//! Tests for file discovery feeding the scan pipeline.

#![allow(clippy::unwrap_used)]

use regex::Regex;

use secrethunter::discover::find_text_files;
use secrethunter::engine::{Base64Engine, Engine};
use secrethunter::scanner::scan_files;

#[test]
fn test_binary_files_never_reach_the_scanner() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("creds.txt"), "cGFzc3dvcmQxMjM=\n").unwrap();
    // NUL bytes mark the file as application/octet-stream
    std::fs::write(root.join("blob.dat"), b"cGFzc3dvcmQxMjM=\x00\x00\x01").unwrap();
    std::fs::write(
        root.join("prog"),
        b"\x7fELF\x02\x01\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00",
    )
    .unwrap();

    let discovery = find_text_files(root, &[], 2);
    assert_eq!(discovery.files.len(), 1);
    assert!(discovery.files[0].ends_with("creds.txt"));

    let engine = Engine::Base64(Base64Engine::default());
    let (reports, count) = scan_files(&discovery.files, &engine, 2);
    assert_eq!(reports.len(), 1);
    assert_eq!(count, 1);
    assert!(reports[0].file.ends_with("creds.txt"));
}

#[test]
fn test_excluded_directory_is_not_descended() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir(root.join("keep")).unwrap();
    std::fs::create_dir(root.join("skipme")).unwrap();
    std::fs::write(root.join("keep").join("a.txt"), "kept\n").unwrap();
    std::fs::write(root.join("skipme").join("b.txt"), "skipped\n").unwrap();

    let exclusions = vec![Regex::new(r".*/skipme(/|$).*").unwrap()];
    let discovery = find_text_files(root, &exclusions, 2);

    assert_eq!(discovery.files.len(), 1);
    assert!(discovery.files[0].ends_with("a.txt"));
    assert_eq!(discovery.excluded.len(), 1);
    assert!(discovery.excluded[0].ends_with("skipme"));
}

#[test]
fn test_empty_tree_discovers_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let discovery = find_text_files(dir.path(), &[], 2);
    assert!(discovery.files.is_empty());
    assert!(discovery.excluded.is_empty());
}
