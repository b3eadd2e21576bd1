//! CLI tests for Playlint
//!
//! This test suite covers:
//! - Exit codes for clean, warning and error results
//! - Text and JSON output
//! - Config file discovery and command-line overrides
//! - Error handling for invalid arguments and configuration

mod common;

use assert_cmd::Command;
use common::*;
use predicates::prelude::*;

// Helper to get a command for testing
fn playlint_cmd() -> Command {
    let mut cmd = Command::cargo_bin("playlint").unwrap();
    cmd.arg("--no-color");
    cmd
}

const MEDIUM_ONLY: &str = "- hosts: all\n  vars:\n    BadName: 1\n";

#[test]
fn test_help() {
    playlint_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-list"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn test_clean_project_exits_zero() {
    let project = TestProject::new();
    project.write("site.yml", CLEAN_PLAYBOOK);

    playlint_cmd()
        .current_dir(project.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Analyzed 1 file(s), 1 play(s), 2 task(s)"));
}

#[test]
fn test_high_severity_exits_two() {
    let project = TestProject::new();
    let playbook = project.write("site.yml", DIRTY_PLAYBOOK);

    playlint_cmd()
        .arg(&playbook)
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "site.yml:7: [command-instead-of-shell] HIGH Use shell only when shell functionality is required",
        ))
        .stdout(predicate::str::contains("site.yml:9: [var-naming] MEDIUM Task registers a variable"));
}

#[test]
fn test_medium_only_exits_one() {
    let project = TestProject::new();
    let playbook = project.write("site.yml", MEDIUM_ONLY);

    playlint_cmd().arg(&playbook).assert().code(1);
    playlint_cmd().arg("--strict").arg(&playbook).assert().code(2);
}

#[test]
fn test_skip_list_option() {
    let project = TestProject::new();
    let playbook = project.write("site.yml", DIRTY_PLAYBOOK);

    playlint_cmd()
        .args(["-x", "command-shell"])
        .arg(&playbook)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("command-instead-of-shell").not());
}

#[test]
fn test_config_file_discovered() {
    let project = TestProject::new();
    project.write("site.yml", DIRTY_PLAYBOOK);
    project.write(".playlint.yml", "skip_list:\n  - var-naming\n  - command-instead-of-shell\n");

    playlint_cmd().current_dir(project.path()).assert().code(0);
}

#[test]
fn test_config_excludes_relative_to_working_directory() {
    let project = TestProject::new();
    project.write("site.yml", CLEAN_PLAYBOOK);
    project.write("vendor/site.yml", DIRTY_PLAYBOOK);
    project.write(".ansible-lint", "exclude_paths:\n  - vendor\n");

    playlint_cmd()
        .current_dir(project.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Analyzed 1 file(s)"));
}

#[test]
fn test_explicit_config_file() {
    let project = TestProject::new();
    let playbook = project.write("site.yml", MEDIUM_ONLY);
    let config = project.write("lint/config.yml", "warnings_as_errors: true\n");

    playlint_cmd()
        .arg("-c")
        .arg(&config)
        .arg(&playbook)
        .assert()
        .code(2);
}

#[test]
fn test_missing_config_file() {
    let project = TestProject::new();
    playlint_cmd()
        .args(["-c", "does-not-exist.yml"])
        .current_dir(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_unreadable_file_exits_four() {
    let project = TestProject::new();
    let broken = project.write("broken.yml", "a: [1, 2\n");

    playlint_cmd()
        .arg(&broken)
        .assert()
        .code(4)
        .stdout(predicate::str::contains("could not be checked"));
}

#[test]
fn test_json_output() {
    let project = TestProject::new();
    let playbook = project.write("site.yml", DIRTY_PLAYBOOK);

    let output = playlint_cmd()
        .args(["-f", "json"])
        .arg(&playbook)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let findings = json["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 3);
    assert_eq!(findings[0]["rule_id"], "var-naming");
    assert_eq!(findings[0]["location"]["line"], 5);
    assert_eq!(findings[1]["severity"], "high");
    assert_eq!(json["tasks_analyzed"], 2);
}

#[test]
fn test_list_rules() {
    playlint_cmd()
        .arg("--list-rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("command-instead-of-shell (HIGH)"))
        .stdout(predicate::str::contains("var-naming (MEDIUM)"));
}

#[test]
fn test_invalid_format() {
    playlint_cmd()
        .args(["-f", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
