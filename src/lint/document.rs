//! Line-annotated document model.
//!
//! A [`Document`] is the parsed, read-only form of one YAML file. Container
//! nodes carry the line they start on in a dedicated field, and every mapping
//! remembers the line of each of its keys, so no bookkeeping entries are mixed
//! into user data.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use super::types::{LintError, LintOpResult};

/// Action field holding the resolved module name.
pub const MODULE_KEY: &str = "__ansible_module__";

/// Action field holding free-form arguments, one token per item.
pub const ARGUMENTS_KEY: &str = "__ansible_arguments__";

/// A mapping key. YAML allows non-string keys, which are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Str(String),
    Bool(bool),
    Int(i64),
    /// Any other key (floats, null, composite keys), rendered as text.
    Other(String),
}

impl Key {
    /// The key as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) | Key::Other(s) => write!(f, "{}", s),
            Key::Bool(b) => write!(f, "{}", b),
            Key::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Sequence),
    Map(Mapping),
}

impl Node {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Node::Seq(s) => Some(s),
            _ => None,
        }
    }

    /// Line the node starts on, for containers.
    pub fn line(&self) -> Option<usize> {
        match self {
            Node::Seq(s) => s.line,
            Node::Map(m) => m.line,
            _ => None,
        }
    }

    /// Whether the node is null or an empty string, collection or zero.
    pub fn is_empty_value(&self) -> bool {
        match self {
            Node::Null => true,
            Node::Bool(b) => !b,
            Node::Int(i) => *i == 0,
            Node::Float(f) => *f == 0.0,
            Node::Str(s) => s.is_empty(),
            Node::Seq(s) => s.is_empty(),
            Node::Map(m) => m.is_empty(),
        }
    }

    /// Text of a scalar node. Containers and null have none.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Node::Str(s) => Some(s.clone()),
            Node::Bool(b) => Some(b.to_string()),
            Node::Int(i) => Some(i.to_string()),
            Node::Float(f) => Some(f.to_string()),
            Node::Null | Node::Seq(_) | Node::Map(_) => None,
        }
    }
}

/// A sequence node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence {
    items: Vec<Node>,
    line: Option<usize>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    pub fn push(&mut self, node: Node) {
        self.items.push(node);
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Node> for Sequence {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            line: None,
        }
    }
}

/// An insertion-ordered mapping node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: IndexMap<Key, Node>,
    key_lines: HashMap<Key, usize>,
    line: Option<usize>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    /// Line the mapping starts on.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Line a key was declared on.
    pub fn key_line(&self, key: &Key) -> Option<usize> {
        self.key_lines.get(key).copied()
    }

    /// Insert an entry without line information.
    pub fn insert(&mut self, key: impl Into<Key>, value: Node) {
        self.insert_at(key, value, None);
    }

    /// Insert an entry declared on `line`.
    pub fn insert_at(&mut self, key: impl Into<Key>, value: Node, line: Option<usize>) {
        let key = key.into();
        match line {
            Some(line) => {
                self.key_lines.insert(key.clone(), line);
            }
            None => {
                self.key_lines.remove(&key);
            }
        }
        self.entries.insert(key, value);
    }

    /// Get the value of a string key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(&Key::from(key))
    }

    pub fn get_key(&self, key: &Key) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&Key::from(key))
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Node> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classification of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Playbook,
    Tasks,
    Handlers,
    Vars,
    Meta,
    Yaml,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileKind::Playbook => "playbook",
            FileKind::Tasks => "tasks",
            FileKind::Handlers => "handlers",
            FileKind::Vars => "vars",
            FileKind::Meta => "meta",
            FileKind::Yaml => "yaml",
        };
        write!(f, "{}", s)
    }
}

/// One parsed file.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path the document was loaded from.
    pub path: PathBuf,
    /// File classification.
    pub kind: FileKind,
    /// Full parsed tree.
    pub root: Node,
    /// Plays, for playbooks.
    pub plays: Vec<Play>,
    /// Tasks outside any play, for task and handler files.
    pub tasks: Vec<Task>,
}

impl Document {
    /// Line of the document's root container.
    pub fn line(&self) -> Option<usize> {
        self.root.line()
    }

    /// Total number of tasks, inside plays or standalone.
    pub fn task_count(&self) -> usize {
        self.tasks.len() + self.plays.iter().map(|p| p.tasks.len()).sum::<usize>()
    }
}

/// A play of a playbook.
#[derive(Debug, Clone)]
pub struct Play {
    /// Position in the playbook (0-indexed).
    pub index: usize,
    /// The play's own mapping.
    pub node: Mapping,
    /// Tasks from pre_tasks, tasks, post_tasks and handlers, blocks flattened.
    pub tasks: Vec<Task>,
}

impl Play {
    pub fn name(&self) -> Option<&str> {
        self.node.get("name").and_then(Node::as_str)
    }

    /// The play's `vars` block, if it is a mapping.
    pub fn vars(&self) -> Option<&Mapping> {
        self.node.get("vars").and_then(Node::as_mapping)
    }

    pub fn line(&self) -> Option<usize> {
        self.node.line()
    }
}

/// A normalized task.
///
/// The `action` entry is a mapping holding [`MODULE_KEY`] and the module's
/// arguments.
#[derive(Debug, Clone)]
pub struct Task {
    /// Position among the tasks of its play or file (0-indexed).
    pub index: usize,
    /// Index of the enclosing play, if any.
    pub play_index: Option<usize>,
    /// The normalized task mapping.
    pub node: Mapping,
}

impl Task {
    pub fn name(&self) -> Option<&str> {
        self.node.get("name").and_then(Node::as_str)
    }

    pub fn line(&self) -> Option<usize> {
        self.node.line()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.node.get(key)
    }

    /// The task's `vars` block, if it is a mapping.
    pub fn vars(&self) -> Option<&Mapping> {
        self.node.get("vars").and_then(Node::as_mapping)
    }

    /// The `register` target, if any.
    pub fn register(&self) -> Option<&Node> {
        self.node.get("register")
    }

    /// The normalized action mapping.
    pub fn action(&self) -> LintOpResult<&Mapping> {
        self.node
            .get("action")
            .and_then(Node::as_mapping)
            .ok_or_else(|| LintError::Contract(format!("task {} has no 'action' mapping", self.index)))
    }

    /// Resolved name of the module the task invokes.
    pub fn module(&self) -> LintOpResult<&str> {
        self.action()?
            .get(MODULE_KEY)
            .and_then(Node::as_str)
            .ok_or_else(|| LintError::Contract(format!("task {} action lacks '{}'", self.index, MODULE_KEY)))
    }
}
