//! Ordered structured-document model for rule blocks.
//!
//! Rule text is YAML-shaped: top-level `key: value` attributes (keys may carry
//! a parenthesized modifier, e.g. `body (regex)`), flow sequences of scalars,
//! and nested mappings keyed by a target scope name. Documents are parsed
//! through the token shield so `\U` escape tokens pass the parser untouched,
//! and re-emitted in a deterministic style: single-quoted string scalars,
//! 4-space indentation, scalar sequences on one line, no wrapping.
//!
//! Directive and comment lines are not part of the document model; they are
//! handled by the orchestrator before and after parsing.

use crate::models::SyncError;
use crate::tokens::{conceal, reveal};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::fmt::Write as _;
use std::sync::LazyLock;

/// A parsed rule block: an insertion-ordered mapping of attribute names to
/// scalars, sequences, or nested mappings.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDocument {
    root: Mapping,
}

impl RuleDocument {
    /// Parse rule text into a document. Empty or comment-only text parses as
    /// an empty document; a non-mapping root is a format error.
    pub fn parse(text: &str) -> Result<Self, SyncError> {
        let concealed = conceal(text);
        let value: Value =
            serde_yaml::from_str(&concealed).map_err(|err| SyncError::Format(err.to_string()))?;
        let root = match value {
            Value::Null => Mapping::new(),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(SyncError::Format(format!(
                    "expected a mapping at the document root, found {}",
                    value_kind(&other)
                )))
            }
        };
        Ok(Self { root })
    }

    /// Top-level lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(&key_value(key))
    }

    /// True when any of `keys` is present at the top level.
    pub fn has_any(&self, keys: &[&str]) -> bool {
        keys.iter()
            .any(|key| self.root.contains_key(&key_value(key)))
    }

    /// Insert or overwrite a top-level attribute. An existing key keeps its
    /// position; a new key is appended.
    pub fn set(&mut self, key: &str, value: Value) {
        self.root.insert(key_value(key), value);
    }

    /// Remove a top-level attribute, preserving the order of the rest.
    pub fn delete(&mut self, key: &str) -> bool {
        self.root.shift_remove(&key_value(key)).is_some()
    }

    /// Iterate top-level entries with string keys in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.root
            .iter()
            .filter_map(|(key, value)| key.as_str().map(|key| (key, value)))
    }

    /// Serialize back to rule text with the deterministic style, restoring
    /// concealed escape tokens.
    pub fn to_rule_text(&self) -> String {
        let mut out = String::new();
        emit_mapping(&mut out, &self.root, 0);
        reveal(&out)
    }
}

fn key_value(key: &str) -> Value {
    Value::String(key.to_string())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}

fn emit_mapping(out: &mut String, mapping: &Mapping, depth: usize) {
    let pad = "    ".repeat(depth);
    for (key, value) in mapping {
        let key = key_text(key);
        match value {
            Value::Null => {
                let _ = writeln!(out, "{pad}{key}:");
            }
            Value::Mapping(child) => {
                if child.is_empty() {
                    let _ = writeln!(out, "{pad}{key}: {{}}");
                } else {
                    let _ = writeln!(out, "{pad}{key}:");
                    emit_mapping(out, child, depth + 1);
                }
            }
            Value::Sequence(items) if items.iter().all(is_scalar) => {
                let rendered: Vec<String> = items.iter().map(scalar_text).collect();
                let _ = writeln!(out, "{pad}{key}: [{}]", rendered.join(", "));
            }
            Value::Sequence(items) => {
                let _ = writeln!(out, "{pad}{key}:");
                for item in items {
                    match item {
                        Value::Mapping(child) => {
                            let _ = writeln!(out, "{pad}    -");
                            emit_mapping(out, child, depth + 2);
                        }
                        other => {
                            let _ = writeln!(out, "{pad}    - {}", scalar_text(other));
                        }
                    }
                }
            }
            other => {
                let _ = writeln!(out, "{pad}{key}: {}", scalar_text(other));
            }
        }
    }
}

static PLAIN_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_ ()./-]*$").unwrap());

/// Attribute keys stay unquoted whenever the rule syntax allows it, so the
/// `key (modifier):` form survives re-serialization verbatim.
fn key_text(key: &Value) -> String {
    match key {
        Value::String(text) if PLAIN_KEY.is_match(text) && !text.ends_with(' ') => text.clone(),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => format!("'{}'", text.replace('\'', "''")),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_typed_operations() {
        let mut doc = RuleDocument::parse(
            "#include sub rule\ntype: comment\npriority: -1\nset_locked: true",
        )
        .unwrap();
        assert!(doc.has_any(&["priority", "missing"]));
        assert!(!doc.has_any(&["missing"]));
        assert_eq!(doc.get("type"), Some(&Value::String("comment".into())));

        assert!(doc.delete("priority"));
        assert!(!doc.delete("priority"));
        doc.set("action", Value::String("remove".into()));

        let keys: Vec<&str> = doc.entries().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["type", "set_locked", "action"]);
    }

    #[test]
    fn test_parse_empty_and_comment_only() {
        assert!(RuleDocument::parse("").unwrap().entries().next().is_none());
        assert!(RuleDocument::parse("#share rulename\n")
            .unwrap()
            .entries()
            .next()
            .is_none());
    }

    #[test]
    fn test_parse_rejects_non_mapping_root() {
        assert!(RuleDocument::parse("just a scalar").is_err());
        assert!(RuleDocument::parse("title: [unclosed").is_err());
    }

    #[test]
    fn test_set_keeps_position_of_existing_key() {
        let mut doc = RuleDocument::parse("a: 1\nb: 2\nc: 3").unwrap();
        doc.set("b", Value::String("two".into()));
        let keys: Vec<&str> = doc.entries().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_emit_style() {
        let doc = RuleDocument::parse(
            "type: comment\ntitle: \"My Title\"\nset_flair: [\"a\", \"b\"]\npriority: -1\nparent_submission:\n    set_locked: true",
        )
        .unwrap();
        let text = doc.to_rule_text();
        assert_eq!(
            text,
            "type: 'comment'\ntitle: 'My Title'\nset_flair: ['a', 'b']\npriority: -1\nparent_submission:\n    set_locked: true\n"
        );
    }

    #[test]
    fn test_emit_quotes_embedded_single_quotes() {
        let doc = RuleDocument::parse("title: \"it's here\"").unwrap();
        assert_eq!(doc.to_rule_text(), "title: 'it''s here'\n");
    }

    #[test]
    fn test_emit_preserves_escape_tokens() {
        let doc =
            RuleDocument::parse("title (regex): [\"[\\U00000400-\\U000004FF]+\"]").unwrap();
        let text = doc.to_rule_text();
        assert!(text.contains("\\U00000400"));
        assert!(text.contains("\\U000004FF"));
        assert_eq!(text, "title (regex): ['[\\U00000400-\\U000004FF]+']\n");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let doc = RuleDocument::parse("a: x\nb: [1, 2]\nc:\n    d: 'y z'").unwrap();
        let text = doc.to_rule_text();
        let again = RuleDocument::parse(&text).unwrap().to_rule_text();
        assert_eq!(text, again);
    }
}
