//! Task normalization.
//!
//! Tasks can name their module in several ways (`shell: ...`,
//! `ansible.builtin.shell: ...`, `action: shell ...`, `local_action: ...`)
//! and pass arguments as a mapping, a free-form string or `args:`. The
//! normalizer folds all of these into one `action` mapping carrying the
//! resolved module name under [`MODULE_KEY`].

use crate::lint::document::{Key, Mapping, Node, Sequence, Task, ARGUMENTS_KEY, MODULE_KEY};
use crate::lint::{LintError, LintOpResult};

/// Keywords that may appear on a task besides its action.
const TASK_KEYWORDS: &[&str] = &[
    "name", "action", "local_action", "args", "when", "loop", "loop_control",
    "register", "notify", "listen", "ignore_errors", "ignore_unreachable",
    "changed_when", "failed_when", "tags", "become", "become_method",
    "become_user", "become_flags", "become_exe", "delegate_to",
    "delegate_facts", "run_once", "retries", "delay", "until", "async",
    "poll", "environment", "vars", "block", "rescue", "always", "connection",
    "throttle", "timeout", "no_log", "diff", "check_mode", "module_defaults",
    "any_errors_fatal", "debugger", "collections", "remote_user", "port",
];

/// Modules taking a raw command line as free-form argument.
const COMMAND_MODULES: &[&str] = &["command", "shell", "raw", "script", "win_command", "win_shell"];

/// `key=value` options command modules accept inside their free-form text.
const COMMAND_OPTIONS: &[&str] = &[
    "chdir", "creates", "removes", "executable", "stdin", "stdin_add_newline",
    "strip_empty_ends", "warn",
];

/// Collection prefixes that resolve to the plain module name.
const BUILTIN_PREFIXES: &[&str] = &["ansible.builtin.", "ansible.legacy."];

/// Resolve a module reference to the name rules compare against.
pub fn resolve_module(name: &str) -> &str {
    BUILTIN_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}

fn is_task_keyword(key: &str) -> bool {
    TASK_KEYWORDS.contains(&key) || key.starts_with("with_")
}

/// Collect the tasks of a task list, flattening blocks.
pub fn collect_tasks(list: &Sequence, play_index: Option<usize>, out: &mut Vec<Task>) -> LintOpResult<()> {
    for item in list.iter() {
        let Some(raw) = item.as_mapping() else {
            return Err(LintError::InvalidStructure(format!(
                "task entries must be mappings (line {})",
                item.line().map_or_else(|| "?".to_string(), |l| l.to_string())
            )));
        };

        if raw.contains_key("block") {
            for section in ["block", "rescue", "always"] {
                if let Some(children) = raw.get(section).and_then(Node::as_sequence) {
                    collect_tasks(children, play_index, out)?;
                }
            }
            continue;
        }

        let node = normalize_task(raw)?;
        out.push(Task {
            index: out.len(),
            play_index,
            node,
        });
    }
    Ok(())
}

/// Normalize one raw task mapping.
pub fn normalize_task(raw: &Mapping) -> LintOpResult<Mapping> {
    let (module, arguments) = find_action(raw)?;
    let module = resolve_module(&module).to_string();

    let mut action = Mapping::new().with_line(arguments.as_ref().and_then(Node::line).or_else(|| raw.line()));
    action.insert(MODULE_KEY, Node::Str(module.clone()));
    match &arguments {
        Some(Node::Str(text)) => insert_free_form(&mut action, &module, text),
        Some(Node::Map(args)) => copy_entries(&mut action, args),
        Some(other) => {
            if let Some(text) = other.scalar_text() {
                insert_free_form(&mut action, &module, &text);
            }
        }
        None => {}
    }
    if let Some(Node::Map(args)) = raw.get("args") {
        copy_entries(&mut action, args);
    }

    let mut task = Mapping::new().with_line(raw.line());
    for (key, value) in raw.iter() {
        let skip = match key.as_str() {
            Some(k) => k == "args" || k == "action" || k == "local_action" || !is_task_keyword(k),
            None => true,
        };
        if !skip {
            task.insert_at(key.clone(), value.clone(), raw.key_line(key));
        }
    }
    let action_line = raw.key_line(&Key::from("action")).or(action.line());
    task.insert_at("action", Node::Map(action), action_line);
    Ok(task)
}

/// Find the module name and its raw arguments.
fn find_action(raw: &Mapping) -> LintOpResult<(String, Option<Node>)> {
    let mut found: Option<(String, Option<Node>)> = None;

    for (key, value) in raw.iter() {
        let Some(k) = key.as_str() else {
            continue;
        };
        let candidate = match k {
            "action" | "local_action" => Some(split_action_value(value)?),
            _ if is_task_keyword(k) => None,
            _ => Some((k.to_string(), Some(value.clone()))),
        };
        if let Some(candidate) = candidate {
            if let Some((previous, _)) = &found {
                return Err(LintError::InvalidStructure(format!(
                    "conflicting action statements: {}, {} (line {})",
                    previous,
                    candidate.0,
                    raw.line().map_or_else(|| "?".to_string(), |l| l.to_string())
                )));
            }
            found = Some(candidate);
        }
    }

    found.ok_or_else(|| {
        LintError::InvalidStructure(format!(
            "no module/action detected in task (line {})",
            raw.line().map_or_else(|| "?".to_string(), |l| l.to_string())
        ))
    })
}

/// Split an `action:` value into module name and arguments.
fn split_action_value(value: &Node) -> LintOpResult<(String, Option<Node>)> {
    match value {
        Node::Str(text) => {
            let text = text.trim();
            let (module, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
            if module.is_empty() {
                return Err(LintError::InvalidStructure("empty 'action' statement".to_string()));
            }
            Ok((module.to_string(), Some(Node::Str(rest.trim_start().to_string()))))
        }
        Node::Map(map) => match map.get("module").and_then(Node::as_str) {
            Some(module) => Ok((module.to_string(), Some(value.clone()))),
            None => Err(LintError::InvalidStructure(
                "'action' mapping lacks a 'module' key".to_string(),
            )),
        },
        _ => Err(LintError::InvalidStructure("unsupported 'action' value".to_string())),
    }
}

/// Copy module arguments, dropping the `module` key of `action:` mappings.
fn copy_entries(action: &mut Mapping, args: &Mapping) {
    for (key, value) in args.iter() {
        if key.as_str() == Some("module") || action.get_key(key).is_some() {
            continue;
        }
        action.insert_at(key.clone(), value.clone(), args.key_line(key));
    }
}

fn insert_free_form(action: &mut Mapping, module: &str, text: &str) {
    if COMMAND_MODULES.contains(&module) {
        insert_command_line(action, text);
    } else {
        insert_key_values(action, text);
    }
}

/// Command lines are split on spaces only so that newlines and quotes stay
/// visible to rules inspecting the literal command.
fn insert_command_line(action: &mut Mapping, text: &str) {
    let mut arguments = Sequence::new();
    for token in text.split(' ').filter(|t| !t.is_empty()) {
        match token.split_once('=') {
            Some((option, value)) if COMMAND_OPTIONS.contains(&option) => {
                action.insert(option, Node::Str(value.to_string()));
            }
            _ => arguments.push(Node::Str(token.to_string())),
        }
    }
    action.insert(ARGUMENTS_KEY, Node::Seq(arguments));
}

/// Parse `k=v` pairs; remaining words become free-form arguments.
fn insert_key_values(action: &mut Mapping, text: &str) {
    let tokens = shell_words::split(text)
        .unwrap_or_else(|_| text.split_whitespace().map(String::from).collect());

    let mut arguments = Sequence::new();
    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() && !key.contains(char::is_whitespace) => {
                action.insert(key, Node::Str(value.to_string()));
            }
            _ => arguments.push(Node::Str(token)),
        }
    }
    if !arguments.is_empty() {
        action.insert(ARGUMENTS_KEY, Node::Seq(arguments));
    }
}
