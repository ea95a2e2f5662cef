//! Workspace file discovery: glob matching, regex walking, directory
//! exclusion, error and cancellation behavior.

use std::fs::{self, File};
use std::io::Write;

use phpoutline_lsp::{DiscoveryError, FileSystemFilesFinder};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn write_file(dir: &TempDir, rel: &str) {
    let path = dir.path().join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    writeln!(f, "<?php // {}", rel).unwrap();
}

#[tokio::test]
async fn pattern_match_excludes_directories_with_matching_names() {
    let temp = TempDir::new().unwrap();
    write_file(&temp, "a.php");
    write_file(&temp, "b.txt");
    // A directory whose name also matches the glob.
    fs::create_dir(temp.path().join("dir.php")).unwrap();

    let finder = FileSystemFilesFinder::new(temp.path());
    let uris = finder
        .find_by_pattern("*.php", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(uris.len(), 1);
    assert!(uris[0].as_str().ends_with("/a.php"));
}

#[tokio::test]
async fn recursive_pattern_finds_nested_files() {
    let temp = TempDir::new().unwrap();
    write_file(&temp, "index.php");
    write_file(&temp, "src/Models/User.php");
    write_file(&temp, "src/readme.md");

    let finder = FileSystemFilesFinder::new(temp.path());
    let mut uris = finder
        .find_by_pattern("**/*.php", &CancellationToken::new())
        .await
        .unwrap();
    uris.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    assert_eq!(uris.len(), 2);
    assert!(uris.iter().any(|u| u.as_str().ends_with("/index.php")));
    assert!(uris.iter().any(|u| u.as_str().ends_with("/User.php")));
}

#[tokio::test]
async fn malformed_pattern_is_a_discovery_error() {
    let temp = TempDir::new().unwrap();
    let finder = FileSystemFilesFinder::new(temp.path());

    let result = finder
        .find_by_pattern("[invalid", &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(DiscoveryError::Pattern(_))));
}

#[tokio::test]
async fn cancelled_pattern_scan_produces_no_result() {
    let temp = TempDir::new().unwrap();
    write_file(&temp, "a.php");

    let token = CancellationToken::new();
    token.cancel();

    let finder = FileSystemFilesFinder::new(temp.path());
    let result = finder.find_by_pattern("*.php", &token).await;
    assert!(matches!(result, Err(DiscoveryError::Cancelled)));
}

#[tokio::test]
async fn regex_walk_filters_files_and_excludes_directories() {
    let temp = TempDir::new().unwrap();
    write_file(&temp, "a.php");
    write_file(&temp, "src/b.php");
    write_file(&temp, "c.txt");
    // Matches the regex but is a directory.
    fs::create_dir(temp.path().join("d.php")).unwrap();

    let finder = FileSystemFilesFinder::new(temp.path());
    let uris = finder
        .find_by_regex(temp.path(), r"\.php$", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(uris.len(), 2);
    assert!(uris.iter().all(|u| u.as_str().ends_with(".php")));
    assert!(!uris.iter().any(|u| u.as_str().ends_with("/d.php")));
}

#[cfg(unix)]
#[tokio::test]
async fn regex_walk_follows_symbolic_links() {
    let temp = TempDir::new().unwrap();
    write_file(&temp, "real/inner.php");
    std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("linked")).unwrap();

    let finder = FileSystemFilesFinder::new(temp.path());
    let uris = finder
        .find_by_regex(temp.path(), r"linked.*\.php$", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(uris.len(), 1);
    assert!(uris[0].as_str().contains("linked"));
}

#[tokio::test]
async fn nonexistent_root_aborts_the_walk() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("does-not-exist");

    let finder = FileSystemFilesFinder::new(temp.path());
    let result = finder
        .find_by_regex(&missing, r"\.php$", &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(DiscoveryError::Walk(_))));
}

#[tokio::test]
async fn malformed_regex_is_a_discovery_error() {
    let temp = TempDir::new().unwrap();
    let finder = FileSystemFilesFinder::new(temp.path());

    let result = finder
        .find_by_regex(temp.path(), r"(unclosed", &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(DiscoveryError::Regex(_))));
}

#[tokio::test]
async fn cancelled_regex_walk_produces_no_result() {
    let temp = TempDir::new().unwrap();
    write_file(&temp, "a.php");
    write_file(&temp, "b.php");

    let token = CancellationToken::new();
    token.cancel();

    let finder = FileSystemFilesFinder::new(temp.path());
    let result = finder.find_by_regex(temp.path(), r"\.php$", &token).await;

    // Cancellation is observed as an error, never a truncated list.
    assert!(matches!(result, Err(DiscoveryError::Cancelled)));
}
