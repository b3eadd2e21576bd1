//! YAML loading for the linter.
//!
//! This module provides:
//! - Line-annotated parsing of YAML files into [`Document`]s
//! - Task normalization into `action` mappings
//! - File kind detection
//! - The filesystem-backed variables file reader

pub mod kind;
pub mod lines;
pub mod task;

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::lint::document::{Document, FileKind, Mapping, Node, Play};
use crate::lint::rule::VarsFileReader;
use crate::lint::{LintError, LintOpResult};

pub use lines::LineLocator;
pub use task::{collect_tasks, normalize_task, resolve_module};

/// Play keys holding task lists, in execution order.
const PLAY_TASK_SECTIONS: &[&str] = &["pre_tasks", "tasks", "post_tasks", "handlers"];

/// Loads YAML files into line-annotated documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a file, detecting its kind.
    pub fn load_file(&self, path: impl AsRef<Path>) -> LintOpResult<Document> {
        let path = path.as_ref();
        let content = read_file(path)?;
        self.load_str(&content, path, None)
    }

    /// Parse `content` as if read from `path`.
    ///
    /// When `kind` is `None` it is detected from the path and content.
    pub fn load_str(
        &self,
        content: &str,
        path: impl Into<PathBuf>,
        kind: Option<FileKind>,
    ) -> LintOpResult<Document> {
        let path = path.into();
        let root = parse_tree(content, &path)?;
        let kind = kind.unwrap_or_else(|| FileKind::detect(&path, &root));
        debug!(path = %path.display(), %kind, "loaded document");

        let mut document = Document {
            path,
            kind,
            root,
            plays: Vec::new(),
            tasks: Vec::new(),
        };

        match kind {
            FileKind::Playbook => document.plays = build_plays(&document.root)?,
            FileKind::Tasks | FileKind::Handlers => {
                if let Some(list) = document.root.as_sequence() {
                    collect_tasks(list, None, &mut document.tasks)?;
                }
            }
            FileKind::Vars | FileKind::Meta | FileKind::Yaml => {}
        }

        trace!(plays = document.plays.len(), tasks = document.task_count(), "document structure");
        Ok(document)
    }

    /// Read a variables file as a mapping. An empty file is an empty mapping.
    pub fn load_mapping(&self, path: impl AsRef<Path>) -> LintOpResult<Mapping> {
        let path = path.as_ref();
        let vars_error = |message: String| LintError::VarsFile {
            path: path.to_path_buf(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| vars_error(e.to_string()))?;
        match parse_tree(&content, path).map_err(|e| vars_error(e.to_string()))? {
            Node::Map(map) => Ok(map),
            Node::Null => Ok(Mapping::new()),
            _ => Err(vars_error("top level is not a mapping".to_string())),
        }
    }
}

/// Reads variables files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsVarsFileReader;

impl VarsFileReader for FsVarsFileReader {
    fn read(&self, path: &Path) -> LintOpResult<Mapping> {
        DocumentLoader::new().load_mapping(path)
    }
}

fn read_file(path: &Path) -> LintOpResult<String> {
    std::fs::read_to_string(path).map_err(|e| LintError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse YAML text into an annotated tree.
fn parse_tree(content: &str, path: &Path) -> LintOpResult<Node> {
    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| LintError::YamlParse {
        path: path.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })?;
    Ok(LineLocator::new(content).annotate(&value))
}

/// Build the plays of a playbook. `import_playbook` entries are not plays.
fn build_plays(root: &Node) -> LintOpResult<Vec<Play>> {
    let Some(entries) = root.as_sequence() else {
        return Err(LintError::InvalidStructure(
            "playbook must be a list of plays".to_string(),
        ));
    };

    let mut plays = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let Some(node) = entry.as_mapping() else {
            return Err(LintError::InvalidStructure(format!("play {} is not a mapping", index)));
        };
        if node.iter().any(|(k, _)| k.as_str().map_or(false, |k| resolve_module(k) == "import_playbook")) {
            continue;
        }

        let mut tasks = Vec::new();
        for section in PLAY_TASK_SECTIONS {
            if let Some(list) = node.get(section).and_then(Node::as_sequence) {
                collect_tasks(list, Some(index), &mut tasks)?;
            }
        }
        plays.push(Play {
            index,
            node: node.clone(),
            tasks,
        });
    }
    Ok(plays)
}
