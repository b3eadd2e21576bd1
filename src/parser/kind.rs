//! File kind detection.

use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use std::path::Path;

use crate::lint::document::{FileKind, Node};

/// Path patterns, checked in order.
const KIND_PATTERNS: &[(FileKind, &str)] = &[
    (FileKind::Meta, "**/meta/main.{yml,yaml}"),
    (FileKind::Vars, "**/{group_vars,host_vars,vars,defaults}/**"),
    (FileKind::Handlers, "**/handlers/*.{yml,yaml}"),
    (FileKind::Tasks, "**/tasks/**/*.{yml,yaml}"),
];

static KIND_GLOBS: Lazy<GlobSet> = Lazy::new(|| {
    let mut builder = GlobSetBuilder::new();
    for (_, pattern) in KIND_PATTERNS {
        builder.add(Glob::new(pattern).unwrap());
    }
    builder.build().unwrap()
});

/// Keys that mark a top-level entry as a play.
const PLAY_MARKERS: &[&str] = &[
    "hosts",
    "import_playbook",
    "ansible.builtin.import_playbook",
];

impl FileKind {
    /// Classify a file from its path, falling back to its content.
    pub fn detect(path: &Path, root: &Node) -> FileKind {
        if let Some(idx) = KIND_GLOBS.matches(path).into_iter().min() {
            return KIND_PATTERNS[idx].0;
        }

        if is_playbook(root) {
            FileKind::Playbook
        } else {
            FileKind::Yaml
        }
    }
}

/// A playbook is a list of mappings, at least one of which is a play.
fn is_playbook(root: &Node) -> bool {
    let Some(items) = root.as_sequence() else {
        return false;
    };
    let mut has_play = false;
    for item in items.iter() {
        let Some(map) = item.as_mapping() else {
            return false;
        };
        has_play |= PLAY_MARKERS.iter().any(|k| map.contains_key(k));
    }
    has_play
}
