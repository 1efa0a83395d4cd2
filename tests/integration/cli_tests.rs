//! CLI integration tests
//!
//! These tests run the binary against small projects in temp directories.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (name, contents) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }
    dir
}

fn cli() -> Command {
    Command::cargo_bin("rubydeadcode").unwrap()
}

fn scan_json(root: &Path, extra: &[&str]) -> serde_json::Value {
    let output = cli()
        .arg(root)
        .args(["--format", "json", "--quiet"])
        .args(extra)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn dead_names(report: &serde_json::Value) -> Vec<String> {
    report["definitions"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|d| d["status"] == "dead")
        .map(|d| d["full_name"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Scanning
// ============================================================================

#[test]
fn test_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rubydeadcode"))
        .stdout(predicate::str::contains("remove"));
}

#[test]
fn test_json_report() {
    let dir = project(&[
        ("app/models/user.rb", "class User\n  def name; end\n  def legacy; end\nend\n"),
        ("app/main.rb", "User.new.name\n"),
    ]);

    let report = scan_json(dir.path(), &[]);

    assert_eq!(report["dead_count"], 1);
    assert_eq!(dead_names(&report), vec!["User#legacy"]);
    assert_eq!(report["definitions"][0]["kind"], "method");
    assert_eq!(report["parse_errors"].as_array().unwrap().len(), 0);
}

#[test]
fn test_terminal_report() {
    let dir = project(&[("lib/tool.rb", "def run; end\nrun\ndef unused_helper; end\n")]);

    cli()
        .arg(dir.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("unused_helper"))
        .stdout(predicate::str::contains("Found 1 dead definitions"));
}

#[test]
fn test_exclude_pattern() {
    let dir = project(&[
        ("lib/a.rb", "def a; end\n"),
        ("lib/generated/b.rb", "def b; end\n"),
    ]);

    let report = scan_json(dir.path(), &["--exclude", "**/generated/**"]);
    assert_eq!(dead_names(&report), vec!["a"]);
}

#[test]
fn test_plugins_from_lockfile_and_flag() {
    let dir = project(&[
        ("Gemfile.lock", "GEM\n  specs:\n    actionpack (7.1.0)\n"),
        ("app/controllers/users_controller.rb", "class UsersController\n  def index; end\nend\n"),
        ("test/user_test.rb", "class UserTest\n  def test_name; end\nend\n"),
    ]);

    let report = scan_json(dir.path(), &[]);
    assert_eq!(dead_names(&report), vec!["UserTest#test_name"]);

    let report = scan_json(dir.path(), &["--plugin", "minitest"]);
    assert!(dead_names(&report).is_empty());

    let report = scan_json(dir.path(), &["--no-manifest", "--plugin", "minitest"]);
    assert_eq!(dead_names(&report), vec!["UsersController#index"]);
}

#[test]
fn test_show_ignored() {
    let dir = project(&[("app/foo.rb", "class Foo\n  def initialize; end\nend\n")]);

    let report = scan_json(dir.path(), &[]);
    assert!(report["definitions"].as_array().unwrap().is_empty());

    let report = scan_json(dir.path(), &["--show-ignored"]);
    let statuses: Vec<&str> = report["definitions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["ignored", "ignored"]);
}

#[test]
fn test_config_file() {
    let dir = project(&[
        (".deadcode.yml", "exclude:\n  - \"**/legacy/**\"\nreport:\n  format: json\n"),
        ("lib/a.rb", "def a; end\n"),
        ("lib/legacy/b.rb", "def b; end\n"),
    ]);

    let output = cli().arg(dir.path()).arg("--quiet").output().unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(dead_names(&report), vec!["a"]);
}

#[test]
fn test_syntax_errors_are_reported_not_fatal() {
    let dir = project(&[("lib/broken.rb", "def broken(\n"), ("lib/ok.rb", "def ok; end\n")]);

    let report = scan_json(dir.path(), &[]);
    assert_eq!(report["parse_errors"].as_array().unwrap().len(), 1);
    assert_eq!(dead_names(&report), vec!["ok"]);
}

// ============================================================================
// Removing
// ============================================================================

#[test]
fn test_remove_round_trip_through_scan() {
    let dir = project(&[("lib/util.rb", "module Util\n  def self.kept; end\n\n  def self.dropped; end\nend\nUtil.kept\n")]);

    let report = scan_json(dir.path(), &[]);
    let finding = &report["definitions"][0];
    assert_eq!(finding["full_name"], "Util::dropped");
    let location = finding["location"].as_str().unwrap();

    cli()
        .args(["remove", "method", location])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    let rewritten = std::fs::read_to_string(dir.path().join("lib/util.rb")).unwrap();
    assert_eq!(rewritten, "module Util\n  def self.kept; end\nend\nUtil.kept\n");

    let report = scan_json(dir.path(), &[]);
    assert!(dead_names(&report).is_empty());
}

#[test]
fn test_remove_dry_run_leaves_file_alone() {
    let dir = project(&[("foo.rb", "FOO, BAR, BAZ = 42\n")]);
    let file = dir.path().join("foo.rb");
    let location = format!("{}:1:6-1:9", file.display());

    cli()
        .args(["remove", "constant", &location, "--dry-run"])
        .assert()
        .success()
        .stdout("FOO, BAZ = 42\n");

    assert_eq!(std::fs::read_to_string(&file).unwrap(), "FOO, BAR, BAZ = 42\n");
}

#[test]
fn test_remove_stale_location_fails() {
    let dir = project(&[("foo.rb", "def foo; end\n")]);
    let location = format!("{}:3:1-3:13", dir.path().join("foo.rb").display());

    cli()
        .args(["remove", "method", &location])
        .assert()
        .failure()
        .stderr(predicate::str::contains("can't find method"));
}

#[test]
fn test_remove_rejects_bad_arguments() {
    cli()
        .args(["remove", "method", "not-a-location"])
        .assert()
        .failure();

    cli()
        .args(["remove", "function", "foo.rb:1:1-1:2"])
        .assert()
        .failure();
}
