//! Line annotation of parsed YAML.
//!
//! `serde_yaml` does not expose node positions, so lines are recovered from
//! the source text. The locator walks the parsed value in document order and
//! keeps a cursor into the source; each mapping key is placed on the first
//! declaration of that key at or after the cursor. This is exact for the
//! usual block style and for flow mappings, and best effort elsewhere: a key
//! that cannot be found keeps no line.

use serde_yaml::Value;

use crate::lint::document::{Key, Mapping, Node, Sequence};

/// Builds a line-annotated [`Node`] tree.
pub struct LineLocator<'a> {
    lines: Vec<&'a str>,
    /// Current (line index, byte column) position.
    cursor: (usize, usize),
}

impl<'a> LineLocator<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().collect(),
            cursor: (0, 0),
        }
    }

    /// Convert `value` into a node tree annotated with 1-indexed lines.
    pub fn annotate(mut self, value: &Value) -> Node {
        self.node(value)
    }

    fn node(&mut self, value: &Value) -> Node {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Int(i),
                None => Node::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => Node::Str(s.clone()),
            Value::Sequence(items) => {
                let mut seq = Sequence::new();
                let mut line = None;
                for item in items {
                    let node = self.node(item);
                    line = line.or_else(|| node.line());
                    seq.push(node);
                }
                Node::Seq(seq.with_line(line))
            }
            Value::Mapping(entries) => {
                let mut map = Mapping::new();
                let mut first_line = None;
                for (k, v) in entries {
                    let key = key_from_value(k);
                    let line = self.locate(&key);
                    first_line = first_line.or(line);
                    let value = self.node(v);
                    map.insert_at(key, value, line);
                }
                Node::Map(map.with_line(first_line))
            }
            Value::Tagged(tagged) => self.node(&tagged.value),
        }
    }

    /// Find the line declaring `key`, advancing the cursor past it.
    fn locate(&mut self, key: &Key) -> Option<usize> {
        let spellings = spellings(key);
        if spellings.is_empty() {
            return None;
        }

        let (start_line, start_col) = self.cursor;
        for (idx, line) in self.lines.iter().enumerate().skip(start_line) {
            if line.trim_start().starts_with('#') {
                continue;
            }
            let from = if idx == start_line { start_col } else { 0 };
            let found = spellings
                .iter()
                .filter_map(|s| find_key(line, s, from))
                .min_by_key(|(col, _)| *col);
            if let Some((col, len)) = found {
                self.cursor = (idx, col + len);
                return Some(idx + 1);
            }
        }
        None
    }
}

/// Convert a YAML key into a [`Key`].
pub fn key_from_value(value: &Value) -> Key {
    match value {
        Value::String(s) => Key::Str(s.clone()),
        Value::Bool(b) => Key::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Key::Int(i),
            None => Key::Other(n.to_string()),
        },
        Value::Null => Key::Other("null".to_string()),
        Value::Tagged(tagged) => key_from_value(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => {
            Key::Other(serde_yaml::to_string(value).unwrap_or_default().trim().to_string())
        }
    }
}

/// Source spellings a key may have been written with.
fn spellings(key: &Key) -> Vec<String> {
    match key {
        Key::Str(s) if s.is_empty() || s.contains('\n') => Vec::new(),
        Key::Str(s) => vec![s.clone(), format!("\"{}\"", s), format!("'{}'", s)],
        Key::Bool(true) => vec!["true".into(), "True".into(), "TRUE".into()],
        Key::Bool(false) => vec!["false".into(), "False".into(), "FALSE".into()],
        Key::Int(i) => vec![i.to_string()],
        Key::Other(_) => Vec::new(),
    }
}

/// Find `needle` used as a mapping key in `line` at or after byte `from`.
///
/// Returns the column and length of the match.
fn find_key(line: &str, needle: &str, from: usize) -> Option<(usize, usize)> {
    let mut start = from;
    while let Some(pos) = line.get(start..).and_then(|rest| rest.find(needle)) {
        let pos = start + pos;
        if key_position(&line[..pos]) && followed_by_colon(&line[pos + needle.len()..]) {
            return Some((pos, needle.len()));
        }
        start = pos + needle.len();
    }
    None
}

/// Whether a key may start right after `before`.
fn key_position(before: &str) -> bool {
    let before = before.trim_end();
    if before.is_empty() {
        return true;
    }
    if before.ends_with('{') || before.ends_with(',') || before.ends_with('?') {
        return true;
    }
    // Sequence entry markers: "- key:" or "- - key:"
    before.ends_with('-') && before.trim_start().chars().all(|c| c == '-' || c == ' ')
}

fn followed_by_colon(after: &str) -> bool {
    let after = after.trim_start_matches([' ', '\t']);
    match after.strip_prefix(':') {
        Some(rest) => rest.is_empty() || rest.starts_with([' ', '\t', ',', '}']),
        None => false,
    }
}
