//! Edge case and error handling tests for canopy


use assert_cmd::Command;
use harness::{TestTree, entry_name, run_canopy, stat_value, tree_lines};
use predicates::prelude::*;

fn canopy() -> Command {
    let mut cmd = Command::cargo_bin("canopy").expect("Failed to find canopy binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Fatal errors
// ============================================================================

#[test]
fn test_missing_root_fails() {
    let tree = TestTree::new();
    canopy()
        .current_dir(tree.path())
        .arg("does-not-exist")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with(
            "canopy: cannot access 'does-not-exist'",
        ));
}

#[test]
fn test_file_root_fails() {
    let tree = TestTree::new();
    tree.add_file("plain.txt", "text");
    canopy()
        .current_dir(tree.path())
        .arg("plain.txt")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn test_malformed_filters_fail() {
    let tree = TestTree::new();
    for args in [
        ["-s", "> lots"],
        ["-s", "100"],
        ["-s", "> 5 parsecs"],
        ["-d", "> yesterday"],
        ["-d", "~ 2024-01-01"],
    ] {
        canopy()
            .current_dir(tree.path())
            .args(args)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("filter"));
    }
}

#[test]
fn test_bad_thread_count_fails() {
    let tree = TestTree::new();
    canopy()
        .current_dir(tree.path())
        .args(["-t", "many"])
        .assert()
        .code(1);
}

#[test]
fn test_json_conflicts_with_github() {
    canopy()
        .args(["--json", "-g", "https://github.com/owner/repo"])
        .assert()
        .code(1);
}

#[test]
fn test_invalid_github_url_fails() {
    canopy()
        .args(["-g", "https://example.com/owner/repo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid GitHub repository URL"));
}

#[test]
fn test_unwritable_output_fails() {
    let tree = TestTree::new();
    tree.add_file("a.txt", "a");
    let target = tree.path().join("missing-dir").join("out.txt");
    canopy()
        .current_dir(tree.path())
        .args(["-o", &target.to_string_lossy()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot write to"));
}

#[test]
fn test_help_and_version_succeed() {
    canopy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--github-depth"));
    canopy()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("canopy "));
}

// ============================================================================
// Degraded walks
// ============================================================================

#[test]
fn test_empty_directory() {
    let tree = TestTree::new();
    let (stdout, _stderr, success) = run_canopy(tree.path(), &[]);
    assert!(success);
    assert_eq!(tree_lines(&stdout), vec!["[DIR]"]);
    assert_eq!(stat_value(&stdout, "Directories"), Some(0));
    assert_eq!(stat_value(&stdout, "Files"), Some(0));
}

#[test]
fn test_filters_leave_empty_directories_visible() {
    let tree = TestTree::new();
    tree.add_file("logs/a.log", "a");
    tree.add_file("logs/b.log", "b");

    let (stdout, _stderr, success) = run_canopy(tree.path(), &["-n", "*.rs"]);
    assert!(success);
    let lines = tree_lines(&stdout);
    assert_eq!(lines.len(), 2);
    assert_eq!(entry_name(lines[1]), "logs");
}

#[test]
fn test_level_zero_is_unlimited() {
    let tree = TestTree::new();
    tree.add_file("a/b/c/d/e.txt", "e");

    let (stdout, _stderr, success) = run_canopy(tree.path(), &["-L", "0"]);
    assert!(success);
    assert!(!stdout.contains("Depth limited"));
    assert!(!stdout.contains("(contents hidden)"));
    assert!(stdout.contains("e.txt"));
}

#[test]
fn test_unicode_names() {
    let tree = TestTree::new();
    tree.add_file("données/résumé.txt", "r");
    tree.add_file("日本語.md", "j");

    let (stdout, _stderr, success) = run_canopy(tree.path(), &[]);
    assert!(success);
    let lines = tree_lines(&stdout);
    let names: Vec<&str> = lines[1..].iter().map(|l| entry_name(l)).collect();
    assert_eq!(names, vec!["données", "résumé.txt", "日本語.md"]);
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::fs;
    use std::os::unix::fs::{PermissionsExt, symlink};

    #[test]
    fn test_permissions_column() {
        let tree = TestTree::new();
        let script = tree.add_file("run.sh", "#!/bin/sh\n");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o754)).unwrap();

        let (stdout, _stderr, success) = run_canopy(tree.path(), &[]);
        assert!(success);
        assert!(stdout.contains("run.sh (10 B) | "));
        assert!(stdout.contains(" | rwxr-xr--"), "{}", stdout);
    }

    #[test]
    fn test_dangling_symlink_gets_sentinels() {
        let tree = TestTree::new();
        symlink(tree.path().join("nowhere"), tree.path().join("dangling")).unwrap();

        let (stdout, _stderr, success) = run_canopy(tree.path(), &[]);
        assert!(success);
        assert!(
            stdout.contains("└── dangling (0 B) | N/A | ---------"),
            "{}",
            stdout
        );
    }

    #[test]
    fn test_symlink_to_parent_does_not_loop() {
        let tree = TestTree::new();
        tree.add_file("subdir/file.txt", "f");
        symlink("..", tree.path().join("subdir").join("parent")).unwrap();

        let (stdout, _stderr, success) = run_canopy(tree.path(), &[]);
        assert!(success, "canopy should not hang on a parent symlink");
        let lines = tree_lines(&stdout);
        let names: Vec<&str> = lines[1..].iter().map(|l| entry_name(l)).collect();
        assert_eq!(names, vec!["subdir", "parent", "file.txt"]);
    }

    #[test]
    fn test_unreadable_directory_keeps_going() {
        let tree = TestTree::new();
        tree.add_file("locked/secret.txt", "s");
        tree.add_file("open.txt", "o");
        let locked = tree.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let (stdout, _stderr, success) = run_canopy(tree.path(), &[]);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(success);
        let lines = tree_lines(&stdout);
        assert_eq!(entry_name(lines[1]), "locked");
        assert_eq!(entry_name(lines.last().unwrap()), "open.txt");
    }
}
