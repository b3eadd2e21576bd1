//! Variable name validation.

use super::document::Key;

/// Reserved words of the variable host language. Variables with these names
/// cannot be referenced from templates.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break",
    "class", "continue", "def", "del", "elif", "else", "except", "finally",
    "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal",
    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

/// Check whether `ident` is a reserved keyword.
pub fn is_reserved_keyword(ident: &str) -> bool {
    RESERVED_KEYWORDS.contains(&ident)
}

/// Check if a variable name is using the right pattern.
///
/// Returns `true` when `ident` is a **valid** identifier: a string of ASCII
/// letters, digits and underscores, not starting with a digit, and not a
/// reserved keyword. Callers negate the result to detect violations.
pub fn is_invalid_variable_name(ident: &Key) -> bool {
    let Some(ident) = ident.as_str() else {
        return false;
    };

    if !ident.is_ascii() {
        return false;
    }

    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }

    !is_reserved_keyword(ident)
}
