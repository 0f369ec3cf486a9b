//! First-line inclusion and sharing directive parsing.
//!
//! Only the first line of a rule block can carry a directive. Both forms are
//! matched case-insensitively after line-ending normalization, with the
//! patterns compiled once.

use crate::blocks::normalize_line_endings;
use regex::Regex;
use std::sync::LazyLock;

/// Request to populate this rule from another community's shared rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionDirective {
    pub community: String,
    pub rule_name: String,
    /// When set, the shared rule's enforcement actions are accepted as-is
    /// instead of being merged with the local copy.
    pub preserve_actions: bool,
}

/// Declaration that this rule is the shareable source for its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharingDirective {
    pub rule_name: String,
}

static INCLUDE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*#include (?:/?r/)?([\w-]+)( -p)? (.+)$").unwrap());

static SHARE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*#share (.+)$").unwrap());

/// Parse an inclusion directive from the first line of a rule block.
pub fn match_inclusion(rule: &str) -> Option<InclusionDirective> {
    let normalized = normalize_line_endings(rule);
    let first_line = normalized.split('\n').next().unwrap_or("");
    let captures = INCLUDE_LINE.captures(first_line)?;
    if captures.len() > 4 {
        return None;
    }
    Some(InclusionDirective {
        community: captures.get(1)?.as_str().to_string(),
        preserve_actions: captures.get(2).is_some(),
        rule_name: captures.get(3)?.as_str().trim().to_string(),
    })
}

/// Parse a sharing directive from the first line of a rule block.
pub fn match_sharing(rule: &str) -> Option<SharingDirective> {
    let normalized = normalize_line_endings(rule);
    let first_line = normalized.split('\n').next().unwrap_or("");
    let captures = SHARE_LINE.captures(first_line)?;
    Some(SharingDirective {
        rule_name: captures.get(1)?.as_str().trim().to_string(),
    })
}
