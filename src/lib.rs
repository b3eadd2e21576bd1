//! # Playlint - A Rule-Driven Playbook Linter
//!
//! Playlint checks Ansible-compatible playbooks, task files and variables
//! files against a set of rules and reports findings with their location.
//!
//! ## Core Concepts
//!
//! - **Documents**: YAML files parsed into a line-annotated tree
//! - **Rules**: Checks that match against a whole document, a play or a task
//! - **Findings**: Rule violations with severity and location
//! - **Linter**: Dispatches every enabled rule and aggregates findings
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      CLI Interface                        │
//! │                (clap-based option parsing)                │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Document Loader                        │
//! │     (serde_yaml + line annotation + task normalizing)     │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Linter                             │
//! │       (document → play → task dispatch, rayon pool)       │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//! ┌─────────────────────────┐     ┌─────────────────────────┐
//! │ command-instead-of-shell│     │       var-naming        │
//! └─────────────────────────┘     └─────────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use playlint::prelude::*;
//!
//! fn main() -> std::result::Result<(), LintError> {
//!     let linter = Linter::new(LintConfig::default())?;
//!     let result = linter.lint_paths(&["site.yml".into()]);
//!
//!     for finding in &result.findings {
//!         println!("{}", finding);
//!     }
//!     println!("{}", result.summary());
//!     Ok(())
//! }
//! ```

// Re-export commonly used items in prelude
pub mod prelude {
    //! Common imports for Playlint.
    //!
    //! ```rust,ignore
    //! use playlint::prelude::*;
    //! ```

    pub use crate::error::{Error, Result};
    pub use crate::lint::{
        Document, FileKind, Finding, LintConfig, LintError, LintResult, Linter, Location, Rule,
        RuleCollection, RuleMetadata, Severity, TaskMatch,
    };
    pub use crate::parser::DocumentLoader;
}

/// Error types and result aliases for Playlint operations.
pub mod error;

/// Loading of the lint configuration from project files.
pub mod config;

/// The rule engine, the document model and the built-in rules.
pub mod lint;

/// YAML loading, line annotation and task normalization.
pub mod parser;

/// Returns the current version of Playlint.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
