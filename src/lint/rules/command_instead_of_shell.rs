//! `command-instead-of-shell`: shell used where no shell feature is needed.

use crate::lint::document::{Document, Node, Task, ARGUMENTS_KEY};
use crate::lint::rule::{Rule, RuleMetadata, TaskMatch};
use crate::lint::template::{unjinja, unjinja_tokens};
use crate::lint::types::{LintOpResult, Severity};

/// Characters whose presence means the command relies on the shell.
const SHELL_METACHARACTERS: &[char] = &[
    '&', '|', '<', '>', ';', '$', '\n', '*', '[', ']', '{', '}', '?', '`',
];

const METADATA: RuleMetadata = RuleMetadata {
    id: "command-instead-of-shell",
    shortdesc: "Use shell only when shell functionality is required",
    description: "Shell should only be used when piping, redirecting or chaining commands \
                  (and Ansible would be preferred for some of those!)",
    severity: Severity::High,
    tags: &["command-shell", "idiom"],
    version_added: "historic",
};

/// Flags `shell` tasks whose command would run unchanged under `command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandInsteadOfShellRule;

impl CommandInsteadOfShellRule {
    /// The command text of a shell action with placeholders stripped, or
    /// `None` when `cmd` is neither a scalar nor a list.
    fn command_text(task: &Task) -> LintOpResult<Option<String>> {
        let action = task.action()?;
        let text = match action.get("cmd") {
            Some(Node::Seq(tokens)) => Some(unjinja_tokens(tokens.iter().filter_map(Node::scalar_text))),
            Some(cmd) => cmd.scalar_text().map(|text| unjinja(&text)),
            None => {
                let arguments = action.get(ARGUMENTS_KEY).and_then(Node::as_sequence);
                Some(unjinja_tokens(
                    arguments.into_iter().flat_map(|a| a.iter()).filter_map(Node::scalar_text),
                ))
            }
        };
        Ok(text)
    }
}

impl Rule for CommandInsteadOfShellRule {
    fn metadata(&self) -> &RuleMetadata {
        &METADATA
    }

    fn match_task(&self, task: &Task, _document: &Document) -> LintOpResult<TaskMatch> {
        if task.module()? != "shell" {
            return Ok(TaskMatch::NoMatch);
        }

        match Self::command_text(task)? {
            Some(command) => Ok(TaskMatch::from(!command.contains(SHELL_METACHARACTERS))),
            None => Ok(TaskMatch::NoMatch),
        }
    }
}
