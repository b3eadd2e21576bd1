//! Rule dispatch.
//!
//! The [`Linter`] walks a document and invokes every enabled rule at each
//! granularity: once for the whole file, once per play and once per task.
//! Rules are independent, so invocations may run on rayon's pool; the final
//! findings are sorted, which makes parallel and sequential runs produce the
//! same output.

use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use super::document::Document;
use super::rule::{task_location, LintContext, Rule, RuleCollection, VarsFileReader};
use super::types::{Finding, LintConfig, LintError, LintOpResult, LintResult, Location, UncheckedFile};
use crate::parser::{DocumentLoader, FsVarsFileReader};

/// File extensions linted when walking directories.
const YAML_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Runs rules over documents.
pub struct Linter {
    config: LintConfig,
    rules: RuleCollection,
    loader: DocumentLoader,
    vars_reader: Arc<dyn VarsFileReader>,
    excludes: GlobSet,
}

impl Linter {
    /// Create a linter with the built-in rules.
    pub fn new(config: LintConfig) -> LintOpResult<Self> {
        let rules = RuleCollection::with_defaults(&config)?;
        Self::with_rules(config, rules)
    }

    /// Create a linter running `rules`.
    pub fn with_rules(config: LintConfig, rules: RuleCollection) -> LintOpResult<Self> {
        let excludes = build_excludes(&config.exclude_paths)?;
        Ok(Self {
            config,
            rules,
            loader: DocumentLoader::new(),
            vars_reader: Arc::new(FsVarsFileReader),
            excludes,
        })
    }

    /// Replace the variables file reader.
    pub fn with_vars_reader(mut self, reader: Arc<dyn VarsFileReader>) -> Self {
        self.vars_reader = reader;
        self
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleCollection {
        &self.rules
    }

    /// Run all enabled rules over one document.
    ///
    /// Findings are sorted by file, line and rule id. Rule failures become
    /// `internal-error` findings; a variables file that cannot be read or a
    /// broken document contract aborts the pass with an error.
    pub fn lint_document(&self, document: &Document) -> LintOpResult<LintResult> {
        let rules: Vec<&dyn Rule> = self.rules.enabled(&self.config).map(|r| r.as_ref()).collect();
        debug!(
            path = %document.path.display(),
            kind = %document.kind,
            rules = rules.len(),
            "linting document"
        );

        let file_location = || Location::file(&document.path).with_line(document.line());
        let ctx = LintContext {
            document,
            vars_reader: self.vars_reader.as_ref(),
        };

        let mut result = LintResult::new();
        result.files_analyzed.push(document.path.clone());
        result.add_findings(self.invoke_all(&rules, file_location, |rule| rule.match_document(&ctx))?);

        for play in &document.plays {
            result.plays_analyzed += 1;
            let play_location = || {
                Location::file(&document.path)
                    .with_line(play.line())
                    .with_play(play.index)
            };
            result.add_findings(self.invoke_all(&rules, play_location, |rule| rule.match_play(document, play))?);
        }

        let tasks = document.plays.iter().flat_map(|p| p.tasks.iter()).chain(document.tasks.iter());
        for task in tasks {
            result.tasks_analyzed += 1;
            let findings = self.invoke_all(
                &rules,
                || task_location(document, task),
                |rule| {
                    let matched = rule.match_task(task, document)?;
                    Ok(matched.into_findings(rule.metadata(), document, task))
                },
            )?;
            result.add_findings(findings);
        }

        result.sort();
        Ok(result)
    }

    /// Load and lint one file.
    pub fn lint_file(&self, path: impl AsRef<Path>) -> LintOpResult<LintResult> {
        let document = self.loader.load_file(path)?;
        self.lint_document(&document)
    }

    /// Lint files and directories. Files that cannot be checked are recorded
    /// in [`LintResult::unchecked`] instead of stopping the run.
    pub fn lint_paths(&self, paths: &[PathBuf]) -> LintResult {
        let mut result = LintResult::new();
        for file in self.collect_files(paths) {
            match self.lint_file(&file) {
                Ok(file_result) => result.merge(file_result),
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "file could not be checked");
                    result.unchecked.push(UncheckedFile {
                        path: file,
                        reason: e.to_string(),
                    });
                }
            }
        }
        result.sort();
        result
    }

    /// Expand directories into their YAML files, dropping excluded paths.
    pub fn collect_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for path in paths {
            if path.is_dir() {
                let walker = WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));
                for entry in walker.filter_map(Result::ok) {
                    if entry.file_type().is_file()
                        && has_yaml_extension(entry.path())
                        && !self.is_excluded(entry.path(), Some(path))
                    {
                        files.push(entry.into_path());
                    }
                }
            } else if !self.is_excluded(path, None) {
                files.push(path.clone());
            }
        }
        files
    }

    /// Exclude globs match either the path as given or the path relative to
    /// the directory it was found under.
    fn is_excluded(&self, file: &Path, root: Option<&Path>) -> bool {
        let relative = root.and_then(|r| file.strip_prefix(r).ok()).unwrap_or(file);
        let relative = relative.strip_prefix(".").unwrap_or(relative);
        self.excludes.is_match(file) || self.excludes.is_match(relative)
    }

    /// Invoke `matcher` for every rule, sequentially or on the thread pool.
    fn invoke_all<L, F>(&self, rules: &[&dyn Rule], location: L, matcher: F) -> LintOpResult<Vec<Finding>>
    where
        L: Fn() -> Location + Sync,
        F: Fn(&dyn Rule) -> LintOpResult<Vec<Finding>> + Sync,
    {
        let batches: Vec<Vec<Finding>> = if self.config.parallel {
            rules
                .par_iter()
                .map(|rule| invoke(*rule, &location, &matcher))
                .collect::<LintOpResult<_>>()?
        } else {
            rules
                .iter()
                .map(|rule| invoke(*rule, &location, &matcher))
                .collect::<LintOpResult<_>>()?
        };
        Ok(batches.into_iter().flatten().collect())
    }
}

/// Run one matcher, isolating rule failures and panics.
fn invoke<L, F>(rule: &dyn Rule, location: &L, matcher: &F) -> LintOpResult<Vec<Finding>>
where
    L: Fn() -> Location,
    F: Fn(&dyn Rule) -> LintOpResult<Vec<Finding>>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| matcher(rule))) {
        Ok(Ok(findings)) => Ok(findings),
        Ok(Err(LintError::Rule { message, .. })) => {
            error!(rule = rule.id(), %message, "rule failed");
            Ok(vec![Finding::internal_error(rule.id(), message, location())])
        }
        Ok(Err(e)) => Err(e),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic".to_string());
            error!(rule = rule.id(), %message, "rule panicked");
            Ok(vec![Finding::internal_error(rule.id(), message, location())])
        }
    }
}

fn build_excludes(patterns: &[String]) -> LintOpResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.trim_end_matches('/');
        let glob = |p: &str| {
            Glob::new(p).map_err(|e| LintError::RuleConfig(format!("invalid exclude path '{}': {}", pattern, e)))
        };
        builder.add(glob(pattern)?);
        // A bare directory excludes everything below it
        if !pattern.ends_with("**") {
            builder.add(glob(&format!("{}/**", pattern))?);
        }
    }
    builder
        .build()
        .map_err(|e| LintError::RuleConfig(e.to_string()))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.starts_with('.'))
}

fn has_yaml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| YAML_EXTENSIONS.contains(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::document::{FileKind, Mapping, Task};
    use crate::lint::rule::{RuleMetadata, TaskMatch};
    use crate::lint::types::{Severity, INTERNAL_ERROR_RULE_ID};

    const FAILING: RuleMetadata = RuleMetadata {
        id: "always-fails",
        shortdesc: "Fails",
        description: "Returns an error for every task",
        severity: Severity::Low,
        tags: &["test"],
        version_added: "v0.1.0",
    };

    struct AlwaysFails;

    impl Rule for AlwaysFails {
        fn metadata(&self) -> &RuleMetadata {
            &FAILING
        }

        fn match_task(&self, _task: &Task, _document: &Document) -> LintOpResult<TaskMatch> {
            Err(LintError::Rule {
                rule_id: FAILING.id.to_string(),
                message: "boom".to_string(),
            })
        }
    }

    const PANICKING: RuleMetadata = RuleMetadata {
        id: "panics",
        shortdesc: "Panics",
        description: "Panics on every play",
        severity: Severity::Low,
        tags: &["test"],
        version_added: "v0.1.0",
    };

    struct Panics;

    impl Rule for Panics {
        fn metadata(&self) -> &RuleMetadata {
            &PANICKING
        }

        fn match_play(&self, _document: &Document, _play: &crate::lint::document::Play) -> LintOpResult<Vec<Finding>> {
            panic!("play matcher bug");
        }
    }

    fn load(yaml: &str) -> Document {
        DocumentLoader::new().load_str(yaml, "site.yml", None).unwrap()
    }

    const PLAYBOOK: &str = "- hosts: all\n  vars:\n    BadName: 1\n  tasks:\n    - shell: echo hi\n      register: Out\n";

    #[test]
    fn test_dispatch_all_granularities() {
        let linter = Linter::new(LintConfig::new()).unwrap();
        let result = linter.lint_document(&load(PLAYBOOK)).unwrap();

        let ids: Vec<&str> = result.findings.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["var-naming", "command-instead-of-shell", "var-naming"]);
        assert_eq!(result.plays_analyzed, 1);
        assert_eq!(result.tasks_analyzed, 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = Linter::new(LintConfig::new()).unwrap();
        let mut config = LintConfig::new();
        config.parallel = true;
        let parallel = Linter::new(config).unwrap();

        let doc = load(PLAYBOOK);
        assert_eq!(
            sequential.lint_document(&doc).unwrap().findings,
            parallel.lint_document(&doc).unwrap().findings
        );
    }

    #[test]
    fn test_rule_errors_are_isolated() {
        let mut rules = RuleCollection::with_defaults(&LintConfig::new()).unwrap();
        rules.register(Arc::new(AlwaysFails));
        rules.register(Arc::new(Panics));
        let linter = Linter::with_rules(LintConfig::new(), rules).unwrap();

        let result = linter.lint_document(&load(PLAYBOOK)).unwrap();
        let internal = result.findings_for_rule(INTERNAL_ERROR_RULE_ID);
        assert_eq!(internal.len(), 2);
        assert!(internal.iter().any(|f| f.message.contains("boom")));
        assert!(internal.iter().any(|f| f.message.contains("play matcher bug")));
        // Other rules still ran
        assert_eq!(result.findings_for_rule("var-naming").len(), 2);
    }

    #[test]
    fn test_contract_violation_propagates() {
        let mut doc = load(PLAYBOOK);
        doc.plays[0].tasks[0] = Task {
            index: 0,
            play_index: Some(0),
            node: Mapping::new(),
        };
        let linter = Linter::new(LintConfig::new()).unwrap();
        assert!(matches!(linter.lint_document(&doc), Err(LintError::Contract(_))));
    }

    #[test]
    fn test_disabled_rules_skipped() {
        let mut config = LintConfig::new();
        config.skip_list.push("var-naming".to_string());
        let linter = Linter::new(config).unwrap();
        let result = linter.lint_document(&load(PLAYBOOK)).unwrap();
        assert!(result.findings.iter().all(|f| f.rule_id == "command-instead-of-shell"));
    }

    #[test]
    fn test_vars_file_errors_propagate() {
        struct Unreadable;
        impl VarsFileReader for Unreadable {
            fn read(&self, path: &Path) -> LintOpResult<Mapping> {
                Err(LintError::VarsFile {
                    path: path.to_path_buf(),
                    message: "denied".to_string(),
                })
            }
        }

        let doc = DocumentLoader::new()
            .load_str("a: 1\n", "group_vars/all.yml", Some(FileKind::Vars))
            .unwrap();
        let linter = Linter::new(LintConfig::new())
            .unwrap()
            .with_vars_reader(Arc::new(Unreadable));
        assert!(matches!(linter.lint_document(&doc), Err(LintError::VarsFile { .. })));
    }

    #[test]
    fn test_relative_excludes() {
        let mut config = LintConfig::new();
        config.exclude_paths = vec!["vendor".to_string(), "roles/*/files/**".to_string()];
        let linter = Linter::new(config).unwrap();

        let root = Path::new("/work/project");
        assert!(linter.is_excluded(&root.join("vendor/site.yml"), Some(root)));
        assert!(linter.is_excluded(Path::new("./roles/web/files/x.yml"), Some(Path::new("."))));
        assert!(linter.is_excluded(Path::new("./vendor/deep/a.yml"), None));
        assert!(!linter.is_excluded(&root.join("site.yml"), Some(root)));
        assert!(!linter.is_excluded(&root.join("vendored.yml"), Some(root)));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let mut config = LintConfig::new();
        config.exclude_paths.push("[".to_string());
        assert!(matches!(Linter::new(config), Err(LintError::RuleConfig(_))));
    }
}
