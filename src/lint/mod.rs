//! Playbook linting.
//!
//! This module provides the rule engine and its building blocks:
//!
//! - The line-annotated document model ([`Document`], [`Play`], [`Task`])
//! - The rule contract ([`Rule`]) and the built-in rules
//! - Dispatch over documents, plays and tasks ([`Linter`])
//! - Helpers shared by rules: identifier validation, key walking and
//!   template normalization
//!
//! # Example
//!
//! ```rust,ignore
//! use playlint::lint::{LintConfig, Linter};
//!
//! let linter = Linter::new(LintConfig::default())?;
//! let result = linter.lint_file("site.yml")?;
//!
//! for finding in &result.findings {
//!     println!("{}: {}", finding.location, finding.message);
//! }
//! ```

pub mod document;
mod engine;
pub mod naming;
pub mod rule;
pub mod rules;
pub mod template;
mod types;
pub mod walker;

pub use document::{Document, FileKind, Key, Mapping, Node, Play, Sequence, Task};
pub use engine::Linter;
pub use naming::is_invalid_variable_name;
pub use rule::{LintContext, Rule, RuleCollection, RuleMetadata, TaskMatch, VarsFileReader};
pub use rules::{CommandInsteadOfShellRule, VarNamingRule, DEFAULT_VAR_NAMING_PATTERN};
pub use template::{unjinja, unjinja_tokens};
pub use types::{
    Finding, LintConfig, LintError, LintOpResult, LintResult, Location, Severity, UncheckedFile,
    INTERNAL_ERROR_RULE_ID,
};
pub use walker::{recursive_items, WalkItem};
