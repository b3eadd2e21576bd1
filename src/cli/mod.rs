//! CLI module for Playlint
//!
//! This module provides the command-line interface: argument parsing and
//! merging of command-line options into the lint configuration.

pub mod output;

use clap::{Parser, ValueEnum};
use playlint::lint::LintConfig;
use std::path::PathBuf;

/// Playlint - A rule-driven playbook linter
///
/// Checks playbooks, task files and variables files for common mistakes.
#[derive(Parser, Debug, Clone)]
#[command(name = "playlint")]
#[command(author = "Playlint Contributors")]
#[command(version)]
#[command(about = "A rule-driven linter for Ansible-compatible playbooks", long_about = None)]
pub struct Cli {
    /// Files or directories to lint
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short = 'c', long, env = "PLAYLINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, default_value = "text")]
    pub format: OutputFormat,

    /// Skip rules by id or tag
    #[arg(short = 'x', long = "skip-list", action = clap::ArgAction::Append)]
    pub skip_list: Vec<String>,

    /// Only run rules carrying one of these tags
    #[arg(short = 't', long = "tags", action = clap::ArgAction::Append)]
    pub tags: Vec<String>,

    /// Treat every finding as an error
    #[arg(long)]
    pub strict: bool,

    /// Run rules in parallel
    #[arg(long)]
    pub parallel: bool,

    /// List the available rules and exit
    #[arg(short = 'L', long = "list-rules")]
    pub list_rules: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per finding, colored
    #[default]
    Text,
    /// The full result as JSON
    Json,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }

    /// Merge command-line options into `config`. Lists extend, flags only
    /// switch settings on.
    pub fn apply_to(&self, config: &mut LintConfig) {
        config.skip_list.extend(self.skip_list.iter().cloned());
        config.tags.extend(self.tags.iter().cloned());
        config.parallel |= self.parallel;
        config.warnings_as_errors |= self.strict;
    }
}
