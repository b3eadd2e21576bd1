//! Recursive traversal of mapping keys.

use super::document::{Key, Mapping, Node};

/// Check if a key is an internal property (`__name__`).
pub fn is_property(key: &Key) -> bool {
    key.as_str()
        .map_or(false, |k| k.starts_with("__") && k.ends_with("__"))
}

/// One pair yielded by [`recursive_items`].
#[derive(Debug, Clone, Copy)]
pub struct WalkItem<'a> {
    pub key: &'a Key,
    pub value: &'a Node,
    /// Line the key was declared on.
    pub line: Option<usize>,
}

/// Depth-first, pre-order iterator over the keys of a mapping tree.
///
/// A nested mapping's pairs follow immediately after the pair holding it.
/// Internal properties are skipped along with everything below them.
pub struct RecursiveItems<'a> {
    stack: Vec<(&'a Mapping, indexmap::map::Iter<'a, Key, Node>)>,
}

impl<'a> Iterator for RecursiveItems<'a> {
    type Item = WalkItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (mapping, entries) = self.stack.last_mut()?;
            let mapping: &'a Mapping = *mapping;
            let Some((key, value)) = entries.next() else {
                self.stack.pop();
                continue;
            };

            if is_property(key) {
                continue;
            }

            if let Node::Map(child) = value {
                self.stack.push((child, child.iter()));
            }

            return Some(WalkItem {
                key,
                value,
                line: mapping.key_line(key),
            });
        }
    }
}

/// Walk every user-defined key of `mapping`, recursing into nested mappings.
pub fn recursive_items(mapping: &Mapping) -> RecursiveItems<'_> {
    RecursiveItems {
        stack: vec![(mapping, mapping.iter())],
    }
}
