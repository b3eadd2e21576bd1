//! `var-naming`: variables must use lowercase letters, digits and underscores.

use regex::Regex;
use tracing::debug;

use crate::lint::document::{Document, FileKind, Key, Mapping, Play, Task};
use crate::lint::naming::is_invalid_variable_name;
use crate::lint::rule::{LintContext, Rule, RuleMetadata, TaskMatch};
use crate::lint::types::{Finding, LintError, LintOpResult, Location, Severity};
use crate::lint::walker::recursive_items;

/// Pattern variable names must match unless configured otherwise.
pub const DEFAULT_VAR_NAMING_PATTERN: &str = "^[a-z_][a-z0-9_]*$";

/// `set_fact` options that are not variables.
const SET_FACT_OPTIONS: &[&str] = &["cacheable"];

const METADATA: RuleMetadata = RuleMetadata {
    id: "var-naming",
    shortdesc: "All variables should be named using only lowercase and underscores",
    description: "All variables should be named using only lowercase and underscores",
    severity: Severity::Medium,
    tags: &["formatting", "readability", "experimental"],
    version_added: "v5.0.8",
};

/// Checks variables declared in vars files, play and task `vars`,
/// `set_fact` and `register`.
#[derive(Debug, Clone)]
pub struct VarNamingRule {
    pattern: Regex,
}

impl Default for VarNamingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl VarNamingRule {
    /// Create the rule with the default naming pattern.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_VAR_NAMING_PATTERN).unwrap(),
        }
    }

    /// Create the rule with a custom naming pattern.
    pub fn with_pattern(pattern: &str) -> LintOpResult<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| LintError::RuleConfig(format!("invalid var_naming_pattern '{}': {}", pattern, e)))?;
        Ok(Self { pattern })
    }

    /// Whether `key` breaks the naming convention.
    pub fn violates(&self, key: &Key) -> bool {
        if !is_invalid_variable_name(key) {
            return true;
        }
        key.as_str().map_or(true, |name| !self.pattern.is_match(name))
    }

    fn any_violation<'a>(&self, mut keys: impl Iterator<Item = &'a Key>) -> bool {
        keys.any(|key| self.violates(key))
    }
}

impl Rule for VarNamingRule {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn match_document(&self, ctx: &LintContext<'_>) -> LintOpResult<Vec<Finding>> {
        let document = ctx.document;
        if document.kind != FileKind::Vars {
            return Ok(Vec::new());
        }

        let vars = ctx.vars_reader.read(&document.path)?;
        debug!(path = %document.path.display(), count = vars.len(), "checking variables file");

        let findings = recursive_items(&vars)
            .filter(|item| self.violates(item.key))
            .map(|item| {
                Finding::from_rule(
                    &METADATA,
                    format!("File defines variable '{}' that violates variable naming standards", item.key),
                    Location::file(&document.path).with_line(item.line.or_else(|| vars.line())),
                )
            })
            .collect();
        Ok(findings)
    }

    fn match_play(&self, document: &Document, play: &Play) -> LintOpResult<Vec<Finding>> {
        let empty = Mapping::new();
        let vars = play.vars().unwrap_or(&empty);

        let findings = recursive_items(vars)
            .filter(|item| self.violates(item.key))
            .map(|item| {
                Finding::from_rule(
                    &METADATA,
                    format!(
                        "Play defines variable '{}' within 'vars' section that violates variable naming standards",
                        item.key
                    ),
                    Location::file(&document.path).with_line(vars.line()).with_play(play.index),
                )
            })
            .collect();
        Ok(findings)
    }

    fn match_task(&self, task: &Task, _document: &Document) -> LintOpResult<TaskMatch> {
        if let Some(vars) = task.vars() {
            if self.any_violation(recursive_items(vars).map(|item| item.key)) {
                return Ok(TaskMatch::from(
                    "Task defines variables within 'vars' section that violates variable naming standards",
                ));
            }
        }

        if task.module()? == "set_fact" {
            let facts = recursive_items(task.action()?)
                .map(|item| item.key)
                .filter(|key| !key.as_str().map_or(false, |k| SET_FACT_OPTIONS.contains(&k)));
            if self.any_violation(facts) {
                return Ok(TaskMatch::from(
                    "Task uses 'set_fact' to define variables that violates variable naming standards",
                ));
            }
        }

        if let Some(registered) = task.register().filter(|r| !r.is_empty_value()) {
            let key = match registered.as_str() {
                Some(name) => Key::from(name),
                None => Key::Other(registered.scalar_text().unwrap_or_default()),
            };
            if self.violates(&key) {
                return Ok(TaskMatch::from("Task registers a variable that violates variable naming standards"));
            }
        }

        Ok(TaskMatch::NoMatch)
    }
}
