//! Shared test utilities and fixtures for the Playlint test suite.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use playlint::lint::{Document, FileKind, LintConfig, LintResult, Linter};
use playlint::parser::DocumentLoader;
use tempfile::TempDir;

/// Parse `yaml` as if it were read from `path`.
pub fn load(yaml: &str, path: &str) -> Document {
    DocumentLoader::new()
        .load_str(yaml, path, None)
        .expect("fixture should parse")
}

/// Parse `yaml` as a task file.
pub fn load_tasks(yaml: &str) -> Document {
    DocumentLoader::new()
        .load_str(yaml, "roles/app/tasks/main.yml", Some(FileKind::Tasks))
        .expect("fixture should parse")
}

/// Lint a playbook with the default configuration.
pub fn lint_playbook(yaml: &str) -> LintResult {
    lint_with(yaml, "site.yml", LintConfig::default())
}

/// Lint `yaml` read from `path` with `config`.
pub fn lint_with(yaml: &str, path: &str, config: LintConfig) -> LintResult {
    let linter = Linter::new(config).expect("valid config");
    linter.lint_document(&load(yaml, path)).expect("lint pass should succeed")
}

/// Messages of the findings of one rule, in order.
pub fn messages(result: &LintResult, rule_id: &str) -> Vec<String> {
    result
        .findings_for_rule(rule_id)
        .into_iter()
        .map(|f| f.message.clone())
        .collect()
}

/// A temporary project directory with helpers to write files into it.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write fixture");
        path
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

pub const CLEAN_PLAYBOOK: &str = r#"---
- name: Clean play
  hosts: all
  vars:
    http_port: 80
  tasks:
    - name: Count lines
      shell: cat /etc/hosts | wc -l
      register: line_count
    - name: Greet
      command: echo hello
"#;

pub const DIRTY_PLAYBOOK: &str = r#"---
- name: Dirty play
  hosts: all
  vars:
    BadName: 1
  tasks:
    - name: Plain shell
      shell: echo hello
    - name: Bad register
      command: uptime
      register: UpTime
"#;
