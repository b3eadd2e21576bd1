//! Output formatting module for Playlint
//!
//! Renders lint results as colored text or JSON.

use colored::Colorize;
use playlint::lint::{Finding, LintResult, RuleCollection, Severity, UncheckedFile};

use super::OutputFormat;

/// Renders results in the selected format.
pub struct Reporter {
    /// Use colored output
    use_color: bool,
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(use_color: bool, format: OutputFormat) -> Self {
        // Respect NO_COLOR environment variable
        let use_color = use_color && std::env::var("NO_COLOR").is_err();
        Self { use_color, format }
    }

    /// Render a lint result.
    pub fn render(&self, result: &LintResult) -> serde_json::Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result).map(|mut s| {
                s.push('\n');
                s
            }),
            OutputFormat::Text => Ok(self.render_text(result)),
        }
    }

    fn render_text(&self, result: &LintResult) -> String {
        let mut out = String::new();
        for finding in &result.findings {
            out.push_str(&self.finding_line(finding));
            out.push('\n');
        }
        for unchecked in &result.unchecked {
            out.push_str(&self.unchecked_line(unchecked));
            out.push('\n');
        }

        if !result.findings.is_empty() || !result.unchecked.is_empty() {
            out.push('\n');
        }
        let summary = result.summary();
        if self.use_color {
            let summary = if result.has_errors() || !result.unchecked.is_empty() {
                summary.red().bold()
            } else if result.findings.is_empty() {
                summary.green()
            } else {
                summary.yellow()
            };
            out.push_str(&summary.to_string());
        } else {
            out.push_str(&summary);
        }
        out.push('\n');
        out
    }

    /// `path:line: [rule-id] SEVERITY message`
    fn finding_line(&self, finding: &Finding) -> String {
        if !self.use_color {
            return finding.to_string();
        }

        let severity = finding.severity.to_string();
        let severity = match finding.severity {
            Severity::Critical => severity.red().bold(),
            Severity::High => severity.red(),
            Severity::Medium => severity.yellow(),
            Severity::Low => severity.cyan(),
        };
        format!(
            "{}: [{}] {} {}",
            finding.location.to_string().bold(),
            finding.rule_id.magenta(),
            severity,
            finding.message
        )
    }

    fn unchecked_line(&self, unchecked: &UncheckedFile) -> String {
        let line = format!("{}: could not be checked: {}", unchecked.path.display(), unchecked.reason);
        if self.use_color {
            line.red().to_string()
        } else {
            line
        }
    }

    /// Render the rule listing.
    pub fn render_rules(&self, rules: &RuleCollection) -> serde_json::Result<String> {
        if self.format == OutputFormat::Json {
            let listing: Vec<serde_json::Value> = rules
                .iter()
                .map(|rule| {
                    let meta = rule.metadata();
                    serde_json::json!({
                        "id": meta.id,
                        "shortdesc": meta.shortdesc,
                        "description": meta.description,
                        "severity": meta.severity,
                        "tags": meta.tags,
                        "version_added": meta.version_added,
                    })
                })
                .collect();
            return serde_json::to_string_pretty(&listing).map(|mut s| {
                s.push('\n');
                s
            });
        }

        let mut out = String::new();
        for rule in rules.iter() {
            let meta = rule.metadata();
            let id = if self.use_color {
                meta.id.bold().to_string()
            } else {
                meta.id.to_string()
            };
            out.push_str(&format!(
                "{} ({}) [{}]\n    {}\n",
                id,
                meta.severity,
                meta.tags.join(", "),
                meta.shortdesc
            ));
        }
        Ok(out)
    }
}
