//! The rule contract and the built-in rule collection.
//!
//! A rule implements any of three matchers: whole document, play and task.
//! Matchers it does not override never match. Rules must be stateless so the
//! engine can invoke them from several threads at once.

use std::path::Path;
use std::sync::Arc;

use super::document::{Document, Mapping, Play, Task};
use super::rules::{CommandInsteadOfShellRule, VarNamingRule};
use super::types::{Finding, LintConfig, LintOpResult, Location, Severity};

/// Identity of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMetadata {
    /// Stable identifier (e.g. "var-naming").
    pub id: &'static str,
    /// One-line description, also the message of a bare match.
    pub shortdesc: &'static str,
    /// Longer explanation.
    pub description: &'static str,
    pub severity: Severity,
    pub tags: &'static [&'static str],
    /// Release the rule first appeared in.
    pub version_added: &'static str,
}

/// Raw outcome of a task matcher.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskMatch {
    /// No issue with this task.
    NoMatch,
    /// The task violates the rule; reported with the rule's short description.
    Matched,
    /// The task violates the rule; reported with this message.
    Message(String),
    /// Findings the rule built itself.
    Findings(Vec<Finding>),
}

impl TaskMatch {
    /// Turn the outcome into findings located at `task`.
    pub fn into_findings(self, meta: &RuleMetadata, document: &Document, task: &Task) -> Vec<Finding> {
        let message = match self {
            TaskMatch::NoMatch => return Vec::new(),
            TaskMatch::Findings(findings) => return findings,
            TaskMatch::Matched => meta.shortdesc.to_string(),
            TaskMatch::Message(message) => message,
        };
        vec![Finding::from_rule(meta, message, task_location(document, task))]
    }
}

impl From<bool> for TaskMatch {
    fn from(matched: bool) -> Self {
        if matched {
            TaskMatch::Matched
        } else {
            TaskMatch::NoMatch
        }
    }
}

impl From<String> for TaskMatch {
    fn from(message: String) -> Self {
        TaskMatch::Message(message)
    }
}

impl From<&str> for TaskMatch {
    fn from(message: &str) -> Self {
        TaskMatch::Message(message.to_string())
    }
}

impl From<Vec<Finding>> for TaskMatch {
    fn from(findings: Vec<Finding>) -> Self {
        TaskMatch::Findings(findings)
    }
}

/// Location of a task inside its document.
pub fn task_location(document: &Document, task: &Task) -> Location {
    let mut location = Location::file(&document.path)
        .with_line(task.line())
        .with_task(task.index);
    if let Some(play_index) = task.play_index {
        location = location.with_play(play_index);
    }
    location
}

/// Reads a variables file into a mapping.
pub trait VarsFileReader: Send + Sync {
    fn read(&self, path: &Path) -> LintOpResult<Mapping>;
}

/// Inputs of a document-level matcher.
pub struct LintContext<'a> {
    pub document: &'a Document,
    pub vars_reader: &'a dyn VarsFileReader,
}

/// A lint rule.
pub trait Rule: Send + Sync {
    /// Identity of the rule.
    fn metadata(&self) -> &RuleMetadata;

    fn id(&self) -> &'static str {
        self.metadata().id
    }

    /// Match against the whole file.
    fn match_document(&self, _ctx: &LintContext<'_>) -> LintOpResult<Vec<Finding>> {
        Ok(Vec::new())
    }

    /// Match against one play.
    fn match_play(&self, _document: &Document, _play: &Play) -> LintOpResult<Vec<Finding>> {
        Ok(Vec::new())
    }

    /// Match against one task.
    fn match_task(&self, _task: &Task, _document: &Document) -> LintOpResult<TaskMatch> {
        Ok(TaskMatch::NoMatch)
    }
}

/// Ordered set of rules.
#[derive(Clone, Default)]
pub struct RuleCollection {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection with all built-in rules, configured by `config`.
    pub fn with_defaults(config: &LintConfig) -> LintOpResult<Self> {
        let var_naming = match &config.var_naming_pattern {
            Some(pattern) => VarNamingRule::with_pattern(pattern)?,
            None => VarNamingRule::new(),
        };

        let mut rules = Self::new();
        rules.register(Arc::new(CommandInsteadOfShellRule));
        rules.register(Arc::new(var_naming));
        Ok(rules)
    }

    /// Register a rule. A rule with the same id replaces the earlier one.
    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        match self.rules.iter().position(|r| r.id() == rule.id()) {
            Some(pos) => self.rules[pos] = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Rule>> {
        self.rules.iter().find(|r| r.id() == id).cloned()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<dyn Rule>> {
        self.rules.iter()
    }

    /// Rules `config` allows to run, in registration order.
    pub fn enabled<'a>(&'a self, config: &'a LintConfig) -> impl Iterator<Item = &'a Arc<dyn Rule>> + 'a {
        self.rules.iter().filter(move |r| config.should_run_rule(r.metadata()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rules.iter().map(|r| r.id())).finish()
    }
}
