//! Linter types and error definitions.
//!
//! This module defines the core types used throughout the linting system,
//! including severity levels, findings, lint results and configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use super::rule::RuleMetadata;

/// Rule id used for findings that record a rule failing internally.
pub const INTERNAL_ERROR_RULE_ID: &str = "internal-error";

/// Severity level for findings.
///
/// Ordering is only used for display priority and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style or readability concern.
    Low,
    /// Convention violation that should be reviewed.
    Medium,
    /// Likely problem or unsafe idiom.
    High,
    /// Severe correctness issue, or a rule that failed to run.
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Low
    }
}

/// Location information for a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Path to the file.
    pub file: PathBuf,
    /// Line number (1-indexed). `None` when the line could not be determined.
    pub line: Option<usize>,
    /// Play index (0-indexed) if applicable.
    pub play_index: Option<usize>,
    /// Task index (0-indexed) within the play if applicable.
    pub task_index: Option<usize>,
}

impl Location {
    /// Create a new location with just a file path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: path.into(),
            line: None,
            play_index: None,
            task_index: None,
        }
    }

    /// Add line number, if known.
    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    /// Add play context.
    pub fn with_play(mut self, index: usize) -> Self {
        self.play_index = Some(index);
        self
    }

    /// Add task context.
    pub fn with_task(mut self, index: usize) -> Self {
        self.task_index = Some(index);
        self
    }

    /// Format as a location string. Unknown lines print as `?`.
    pub fn to_location_string(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{}", self.file.display(), line),
            None => format!("{}:?", self.file.display()),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_location_string())
    }
}

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Identifier of the rule that produced the finding (e.g. "var-naming").
    pub rule_id: String,
    /// Short description of the rule.
    pub rule_name: String,
    /// Severity level.
    pub severity: Severity,
    /// Tags of the rule, for filtering.
    pub tags: Vec<String>,
    /// Description of the issue.
    pub message: String,
    /// Location where the issue was found.
    pub location: Location,
}

impl Finding {
    /// Create a new finding.
    pub fn new(
        rule_id: impl Into<String>,
        rule_name: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            rule_name: rule_name.into(),
            severity,
            tags: Vec::new(),
            message: message.into(),
            location,
        }
    }

    /// Create a finding attributed to a rule, taking id, severity and tags from it.
    pub fn from_rule(meta: &RuleMetadata, message: impl Into<String>, location: Location) -> Self {
        Self {
            rule_id: meta.id.to_string(),
            rule_name: meta.shortdesc.to_string(),
            severity: meta.severity,
            tags: meta.tags.iter().map(|t| (*t).to_string()).collect(),
            message: message.into(),
            location,
        }
    }

    /// Create the marker recorded when a rule fails while matching.
    pub fn internal_error(rule_id: &str, message: impl std::fmt::Display, location: Location) -> Self {
        Self::new(
            INTERNAL_ERROR_RULE_ID,
            "Rule failed while linting",
            Severity::Critical,
            format!("Rule '{}' failed: {}", rule_id, message),
            location,
        )
    }

    /// Check if this finding should fail a run by default.
    pub fn is_error(&self) -> bool {
        self.severity >= Severity::High
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: [{}] {} {}",
            self.location, self.rule_id, self.severity, self.message
        )
    }
}

/// A file that could not be checked at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncheckedFile {
    /// Path of the file.
    pub path: PathBuf,
    /// Why it could not be linted.
    pub reason: String,
}

/// Result of linting one or more files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Findings, ordered by file, line and rule id once sorted.
    pub findings: Vec<Finding>,
    /// Files that were analyzed.
    pub files_analyzed: Vec<PathBuf>,
    /// Files that failed to load or whose checks failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unchecked: Vec<UncheckedFile>,
    /// Total number of plays analyzed.
    pub plays_analyzed: usize,
    /// Total number of tasks analyzed.
    pub tasks_analyzed: usize,
}

impl LintResult {
    /// Create a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finding.
    pub fn add_finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Add multiple findings.
    pub fn add_findings(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: LintResult) {
        self.findings.extend(other.findings);
        self.files_analyzed.extend(other.files_analyzed);
        self.unchecked.extend(other.unchecked);
        self.plays_analyzed += other.plays_analyzed;
        self.tasks_analyzed += other.tasks_analyzed;
    }

    /// Order findings by (file, line, rule id).
    ///
    /// The sort is stable, so findings sharing all three keep the order in
    /// which they were produced. Unknown lines sort first.
    pub fn sort(&mut self) {
        self.findings.sort_by(|a, b| {
            (&a.location.file, a.location.line.unwrap_or(0), &a.rule_id).cmp(&(
                &b.location.file,
                b.location.line.unwrap_or(0),
                &b.rule_id,
            ))
        });
    }

    /// Get findings produced by a rule.
    pub fn findings_for_rule(&self, rule_id: &str) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.rule_id == rule_id).collect()
    }

    /// Check if there are any findings of high or critical severity.
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(Finding::is_error)
    }

    /// Get count of findings by severity.
    pub fn count_by_severity(&self) -> std::collections::HashMap<Severity, usize> {
        let mut counts = std::collections::HashMap::new();
        for finding in &self.findings {
            *counts.entry(finding.severity).or_insert(0) += 1;
        }
        counts
    }

    /// Get the exit code based on the findings.
    ///
    /// 0 clean, 1 only low/medium findings, 2 high/critical findings (or any
    /// finding when `warnings_as_errors`), 4 some file could not be checked.
    pub fn exit_code(&self, warnings_as_errors: bool) -> i32 {
        if !self.unchecked.is_empty() {
            4
        } else if self.has_errors() || (warnings_as_errors && !self.findings.is_empty()) {
            2
        } else if !self.findings.is_empty() {
            1
        } else {
            0
        }
    }

    /// Get a summary string.
    pub fn summary(&self) -> String {
        let counts = self.count_by_severity();
        let count = |s: Severity| counts.get(&s).copied().unwrap_or(0);

        format!(
            "Analyzed {} file(s), {} play(s), {} task(s): {} critical, {} high, {} medium, {} low",
            self.files_analyzed.len(),
            self.plays_analyzed,
            self.tasks_analyzed,
            count(Severity::Critical),
            count(Severity::High),
            count(Severity::Medium),
            count(Severity::Low),
        )
    }
}

/// Error type for linter operations.
#[derive(Error, Debug)]
pub enum LintError {
    /// Error reading a file.
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// YAML parsing error.
    #[error("YAML parsing error in '{path}': {message}")]
    YamlParse {
        path: PathBuf,
        message: String,
        line: Option<usize>,
    },

    /// A variables file referenced by a check could not be read or parsed.
    #[error("Failed to load variables file '{path}': {message}")]
    VarsFile { path: PathBuf, message: String },

    /// Invalid playbook structure.
    #[error("Invalid playbook structure: {0}")]
    InvalidStructure(String),

    /// A node lacks a field the document model guarantees.
    #[error("Document model contract violated: {0}")]
    Contract(String),

    /// A rule failed while matching.
    #[error("Rule '{rule_id}' failed: {message}")]
    Rule { rule_id: String, message: String },

    /// Rule configuration error.
    #[error("Rule configuration error: {0}")]
    RuleConfig(String),
}

/// Result type for linter operations.
pub type LintOpResult<T> = Result<T, LintError>;

/// Configuration for the linter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Rules to skip, by rule id or tag.
    pub skip_list: Vec<String>,
    /// Only run these rules (by rule id). Empty means run all.
    pub enable_list: Vec<String>,
    /// Only run rules carrying at least one of these tags. Empty means all.
    pub tags: Vec<String>,
    /// Skip rules carrying any of these tags.
    pub skip_tags: Vec<String>,
    /// Minimum severity a rule must have to run.
    pub min_severity: Severity,
    /// Whether any finding fails the run.
    pub warnings_as_errors: bool,
    /// Glob patterns of paths to exclude from linting.
    pub exclude_paths: Vec<String>,
    /// Pattern every variable name must match.
    pub var_naming_pattern: Option<String>,
    /// Invoke rules on the rayon thread pool.
    pub parallel: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            skip_list: Vec::new(),
            enable_list: Vec::new(),
            tags: Vec::new(),
            skip_tags: Vec::new(),
            min_severity: Severity::Low,
            warnings_as_errors: false,
            exclude_paths: Vec::new(),
            var_naming_pattern: None,
            parallel: false,
        }
    }
}

impl LintConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a rule should be run.
    pub fn should_run_rule(&self, meta: &RuleMetadata) -> bool {
        let has_tag = |list: &[String]| meta.tags.iter().any(|t| list.iter().any(|l| l == t));

        // Skip list matches ids and tags alike
        if self.skip_list.iter().any(|s| s == meta.id) || has_tag(&self.skip_list) {
            return false;
        }

        if !self.enable_list.is_empty() && !self.enable_list.iter().any(|s| s == meta.id) {
            return false;
        }

        if has_tag(&self.skip_tags) {
            return false;
        }

        if !self.tags.is_empty() && !has_tag(&self.tags) {
            return false;
        }

        meta.severity >= self.min_severity
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml(content: &str) -> LintOpResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| LintError::RuleConfig(e.to_string()))
    }
}
