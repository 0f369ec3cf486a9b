//! Attribute-preserving rule merge.
//!
//! When a shared rule replaces a local copy, the local community keeps its own
//! enforcement actions: the replacement's matching logic wins, but every
//! preserved attribute present on the local rule is carried over.

use crate::blocks::normalize_line_endings;
use crate::document::RuleDocument;
use crate::models::SyncError;
use serde_yaml::Value;

/// Enforcement and side-effect attributes retained from the local rule when a
/// shared rule is merged over it. Closed list; preservation applies to
/// top-level keys only. An attribute nested under a child scope key is moved
/// wholesale with that key or not at all.
pub const PRESERVED_ATTRIBUTES: [&str; 21] = [
    "action",
    "action_reason",
    "set_flair",
    "overwrite_flair",
    "set_sticky",
    "set_nsfw",
    "set_spoiler",
    "set_contest_mode",
    "set_original_content",
    "set_suggested_sort",
    "set_locked",
    "report_reason",
    "comment",
    "comment_locked",
    "comment_stickied",
    "modmail",
    "modmail_subject",
    "message",
    "message_subject",
    "moderators_exempt",
    "priority",
];

/// Replace `original` with `replacement`, restoring the original's preserved
/// attributes.
///
/// When the original rule carries none of the preserved attributes, the
/// replacement text is returned as-is apart from line-ending normalization;
/// both inputs are still parsed so a malformed rule surfaces as a format
/// error either way.
pub fn merge(original: &str, replacement: &str) -> Result<String, SyncError> {
    let original = normalize_line_endings(original);
    let replacement = normalize_line_endings(replacement);

    let original_doc = RuleDocument::parse(&original)?;
    let mut replacement_doc = RuleDocument::parse(&replacement)?;

    if !original_doc.has_any(&PRESERVED_ATTRIBUTES) {
        return Ok(replacement);
    }

    for attribute in PRESERVED_ATTRIBUTES {
        replacement_doc.delete(attribute);
    }
    let preserved: Vec<(String, Value)> = original_doc
        .entries()
        .filter(|(key, _)| PRESERVED_ATTRIBUTES.iter().any(|attribute| attribute == key))
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    for (key, value) in preserved {
        replacement_doc.set(&key, value);
    }

    Ok(replacement_doc.to_rule_text())
}
