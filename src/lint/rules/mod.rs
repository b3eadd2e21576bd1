//! Built-in rules.

mod command_instead_of_shell;
mod var_naming;

pub use command_instead_of_shell::CommandInsteadOfShellRule;
pub use var_naming::{VarNamingRule, DEFAULT_VAR_NAMING_PATTERN};
