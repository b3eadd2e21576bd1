//! Template placeholder stripping.
//!
//! Rules that scan literal characters (pipes, redirections, ...) must not
//! trigger on characters that only appear inside a Jinja2 expression, where
//! they are filters or operators rather than shell syntax.

use once_cell::sync::Lazy;
use regex::Regex;

static JINJA_EXPRESSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{\{.*?\}\}").unwrap());
static JINJA_STATEMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{%.*?%\}").unwrap());
static JINJA_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{#.*?#\}").unwrap());

/// Replace every template placeholder in `text` with a plain word.
pub fn unjinja(text: &str) -> String {
    let text = JINJA_EXPRESSION.replace_all(text, "JINJA_EXPRESSION");
    let text = JINJA_STATEMENT.replace_all(&text, "JINJA_STATEMENT");
    JINJA_COMMENT.replace_all(&text, "JINJA_COMMENT").into_owned()
}

/// Join argument tokens with single spaces, then strip placeholders.
pub fn unjinja_tokens<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = tokens
        .into_iter()
        .map(|t| t.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    unjinja(&joined)
}
