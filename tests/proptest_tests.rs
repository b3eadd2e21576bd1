//! Property-based tests for Playlint using proptest.
//!
//! These cover the pure helpers rules rely on: identifier validation, the
//! recursive key walker and template stripping.

use proptest::prelude::*;

use playlint::lint::naming::{is_reserved_keyword, RESERVED_KEYWORDS};
use playlint::lint::walker::is_property;
use playlint::lint::{is_invalid_variable_name, recursive_items, unjinja, Key, Mapping, Node};
use playlint::parser::LineLocator;

// ============================================================================
// Strategies for generating test data
// ============================================================================

/// Strategy for generating syntactically valid identifiers
fn identifier() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,31}"
}

/// Strategy for generating mapping keys, some of them internal properties
fn walk_key() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z][a-z0-9_]{0,7}",
        1 => "__[a-z]{1,6}__",
    ]
}

/// Strategy for generating a mapping whose values come from `values`
fn mapping_of<S>(values: S) -> impl Strategy<Value = serde_yaml::Value>
where
    S: Strategy<Value = serde_yaml::Value>,
{
    prop::collection::vec((walk_key(), values), 0..6).prop_map(|entries| {
        let mut map = serde_yaml::Mapping::new();
        for (k, v) in entries {
            map.insert(serde_yaml::Value::String(k), v);
        }
        serde_yaml::Value::Mapping(map)
    })
}

/// Strategy for generating nested YAML mappings
fn yaml_mapping() -> impl Strategy<Value = serde_yaml::Value> {
    let leaf = prop_oneof![
        Just(serde_yaml::Value::Null),
        any::<bool>().prop_map(serde_yaml::Value::Bool),
        any::<i32>().prop_map(|n| serde_yaml::Value::Number(i64::from(n).into())),
        "[a-z ]{0,12}".prop_map(serde_yaml::Value::String),
    ];
    mapping_of(leaf.prop_recursive(3, 48, 6, |inner| mapping_of(inner)))
}

fn to_mapping(value: &serde_yaml::Value) -> Mapping {
    let source = serde_yaml::to_string(value).unwrap();
    match LineLocator::new(&source).annotate(value) {
        Node::Map(map) => map,
        other => panic!("expected mapping, got {:?}", other),
    }
}

/// Number of keys a walk should yield: everything outside property subtrees.
fn visible_keys(mapping: &Mapping) -> usize {
    mapping
        .iter()
        .filter(|(k, _)| !is_property(k))
        .map(|(_, v)| 1 + v.as_mapping().map_or(0, visible_keys))
        .sum()
}

// ============================================================================
// Identifier validation
// ============================================================================

proptest! {
    #[test]
    fn valid_identifiers_accepted(name in identifier()) {
        prop_assert_eq!(
            is_invalid_variable_name(&Key::from(name.as_str())),
            !is_reserved_keyword(&name)
        );
    }

    #[test]
    fn leading_digit_rejected(digit in "[0-9]", rest in "[a-z0-9_]{0,10}") {
        let name = format!("{}{}", digit, rest);
        prop_assert!(!is_invalid_variable_name(&Key::from(name)));
    }

    #[test]
    fn non_ascii_rejected(prefix in "[a-z_]{0,5}", c in "[à-ÿ一-龥]", suffix in "[a-z_]{0,5}") {
        let name = format!("{}{}{}", prefix, c, suffix);
        prop_assert!(!is_invalid_variable_name(&Key::from(name)));
    }

    #[test]
    fn non_string_keys_rejected(n in any::<i64>(), b in any::<bool>()) {
        prop_assert!(!is_invalid_variable_name(&Key::Int(n)));
        prop_assert!(!is_invalid_variable_name(&Key::Bool(b)));
    }

    #[test]
    fn punctuation_rejected(head in "[a-z]{1,5}", p in "[-. !@#$%^&*()+=:/]", tail in "[a-z]{0,5}") {
        let name = format!("{}{}{}", head, p, tail);
        prop_assert!(!is_invalid_variable_name(&Key::from(name)));
    }
}

#[test]
fn keywords_rejected() {
    for keyword in RESERVED_KEYWORDS {
        assert!(!is_invalid_variable_name(&Key::from(*keyword)), "{}", keyword);
    }
    assert!(is_invalid_variable_name(&Key::from("valid_name")));
    assert!(!is_invalid_variable_name(&Key::from("")));
}

// ============================================================================
// Recursive key walker
// ============================================================================

proptest! {
    #[test]
    fn walker_never_yields_properties(value in yaml_mapping()) {
        let mapping = to_mapping(&value);
        prop_assert!(recursive_items(&mapping).all(|item| !is_property(item.key)));
    }

    #[test]
    fn walker_yields_every_visible_key(value in yaml_mapping()) {
        let mapping = to_mapping(&value);
        prop_assert_eq!(recursive_items(&mapping).count(), visible_keys(&mapping));
    }

    #[test]
    fn walker_is_preorder(value in yaml_mapping()) {
        let mapping = to_mapping(&value);
        let items: Vec<_> = recursive_items(&mapping).collect();
        // A pair holding a non-empty visible mapping is followed by its first child
        for (i, item) in items.iter().enumerate() {
            if let Some(child) = item.value.as_mapping() {
                if let Some((first, _)) = child.iter().find(|(k, _)| !is_property(k)) {
                    prop_assert_eq!(items[i + 1].key, first);
                }
            }
        }
    }
}

// ============================================================================
// Template stripping
// ============================================================================

proptest! {
    #[test]
    fn unjinja_keeps_plain_text(text in "[^{]{0,64}") {
        prop_assert_eq!(unjinja(&text), text);
    }

    #[test]
    fn unjinja_hides_template_characters(
        before in "[a-z ]{0,10}",
        expr in "[a-z|;&$<>' ()]{0,16}",
        after in "[a-z ]{0,10}",
    ) {
        let text = format!("{}{{{{{}}}}}{}", before, expr, after);
        prop_assert_eq!(unjinja(&text), format!("{}JINJA_EXPRESSION{}", before, after));
    }

    #[test]
    fn unjinja_keeps_literal_metacharacters(expr in "[a-z ]{1,8}", meta in "[|;&$<>]") {
        let text = format!("echo {{{{{}}}}} {} cat", expr, meta);
        let stripped = unjinja(&text);
        prop_assert!(stripped.contains(meta.as_str()));
    }
}
