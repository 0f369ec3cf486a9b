//! Synchronization pass over one community's rule configuration.
//!
//! Walks every rule block, resolves `#include` directives against the
//! referenced communities' `#share`-published rules, merges, and rewrites the
//! configuration when anything changed. Failures accumulate as data; only a
//! failed final write supersedes the per-rule results.

use crate::blocks::{join_rules, normalize_line_endings, split_rules, RULE_DELIMITER};
use crate::directive::{match_inclusion, match_sharing, InclusionDirective};
use crate::merge::merge;
use crate::models::settings::SharingSettings;
use crate::store::{ConfigStore, SettingsStore};
use crate::tokens::encode_special_characters;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Why a rule (or the whole pass) failed to synchronize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncFailureReason {
    /// The configuration contains no valid include directives.
    NoIncludes,
    /// The source community does not share rules with this one.
    NotSharing,
    /// The source community publishes no rule under the requested name.
    RuleNotFound,
    /// A rule involved in the merge could not be parsed.
    InvalidFormat,
    /// The final configuration write failed.
    ErrorUpdating,
}

impl SyncFailureReason {
    pub fn label(&self) -> &'static str {
        match self {
            SyncFailureReason::NoIncludes => "no includes",
            SyncFailureReason::NotSharing => "not sharing",
            SyncFailureReason::RuleNotFound => "rule not found",
            SyncFailureReason::InvalidFormat => "invalid format",
            SyncFailureReason::ErrorUpdating => "error updating",
        }
    }
}

/// Outcome for one processed inclusion directive.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSyncResult {
    pub community: String,
    pub rule_name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SyncFailureReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_needed: Option<bool>,
}

impl RuleSyncResult {
    pub fn success(community: &str, rule_name: &str, update_needed: bool) -> Self {
        Self {
            community: community.to_string(),
            rule_name: rule_name.to_string(),
            success: true,
            reason: None,
            update_needed: Some(update_needed),
        }
    }

    pub fn failure(community: &str, rule_name: &str, reason: SyncFailureReason) -> Self {
        Self {
            community: community.to_string(),
            rule_name: rule_name.to_string(),
            success: false,
            reason: Some(reason),
            update_needed: None,
        }
    }
}

/// A source community's published rule set, held for one pass.
enum SourceRules {
    NotSharing,
    Shared(Vec<String>),
}

/// Fetch a community's rule blocks: the live configuration plus, when sharing
/// settings are given, every declared alternate page joined in with a
/// delimiter line. A missing alternate page is skipped silently; an
/// unreadable live configuration yields an empty rule set.
fn fetch_rule_blocks<C: ConfigStore + ?Sized>(
    store: &C,
    community: &str,
    settings: Option<&SharingSettings>,
) -> Vec<String> {
    let mut content = match store.fetch_config(community) {
        Ok(text) => normalize_line_endings(&text),
        Err(err) => {
            debug!("no readable configuration for {community}: {err}");
            return Vec::new();
        }
    };
    if let Some(settings) = settings {
        for page in &settings.alternate_wiki_pages {
            if let Ok(extra) = store.fetch_page(community, page) {
                content.push('\n');
                content.push_str(RULE_DELIMITER);
                content.push('\n');
                content.push_str(&normalize_line_endings(&extra));
            }
        }
    }
    split_rules(&content)
}

/// The canonical form of an included rule: directive line, provenance
/// comment, then the body.
fn rebuild_included_rule(directive: &InclusionDirective, body: &str) -> String {
    let preserve = if directive.preserve_actions { " -p" } else { "" };
    let mut lines = vec![
        format!(
            "#include {}{} {}",
            directive.community, preserve, directive.rule_name
        ),
        format!(
            "# This rule has been synchronised from {}. Edits made to this copy may be lost.",
            directive.community
        ),
    ];
    if !body.is_empty() {
        lines.extend(body.split('\n').map(str::to_string));
    }
    lines.join("\n")
}

/// A shared rule block minus its own first line (the `#share` directive).
fn shared_rule_body(block: &str) -> String {
    let normalized = normalize_line_endings(block);
    match normalized.split_once('\n') {
        Some((_, rest)) => rest.to_string(),
        None => String::new(),
    }
}

/// Run a full synchronization pass for `home`, returning one result per
/// inclusion directive (or a single pass-level failure).
pub fn sync_community<C, S>(home: &str, config: &C, settings: &S) -> Vec<RuleSyncResult>
where
    C: ConfigStore,
    S: SettingsStore,
{
    let mut rules = fetch_rule_blocks(config, home, None);

    let mut sources: Vec<String> = Vec::new();
    for rule in &rules {
        if let Some(directive) = match_inclusion(rule) {
            let key = directive.community.to_lowercase();
            if !sources.contains(&key) {
                sources.push(key);
            }
        }
    }

    info!("rule sync: reading from {} communities", sources.len());

    if sources.is_empty() {
        info!("rule sync: configuration contains no valid include directives");
        return vec![RuleSyncResult::failure(
            home,
            "",
            SyncFailureReason::NoIncludes,
        )];
    }

    // Source fetches are independent of each other; fan out, then key the
    // results by lowercased community name before the merge phase.
    let shared: HashMap<String, SourceRules> = sources
        .par_iter()
        .map(|source| {
            let source_settings = settings.fetch_sharing_settings(source);
            if !source_settings.allows(home) {
                info!("rule sync: {source} is not sharing rules with {home}");
                return (source.clone(), SourceRules::NotSharing);
            }
            let blocks = fetch_rule_blocks(config, source, Some(&source_settings));
            (source.clone(), SourceRules::Shared(blocks))
        })
        .collect();

    let mut results: Vec<RuleSyncResult> = Vec::new();

    for rule in rules.iter_mut() {
        let Some(directive) = match_inclusion(rule) else {
            continue;
        };
        let blocks = match shared.get(&directive.community.to_lowercase()) {
            Some(SourceRules::Shared(blocks)) => blocks,
            _ => {
                results.push(RuleSyncResult::failure(
                    &directive.community,
                    &directive.rule_name,
                    SyncFailureReason::NotSharing,
                ));
                continue;
            }
        };

        let found = blocks.iter().find(|candidate| {
            match_sharing(candidate).is_some_and(|sharing| {
                sharing.rule_name.eq_ignore_ascii_case(&directive.rule_name)
            })
        });
        let Some(found) = found else {
            debug!(
                "rule sync: no match for {} on {}",
                directive.rule_name, directive.community
            );
            results.push(RuleSyncResult::failure(
                &directive.community,
                &directive.rule_name,
                SyncFailureReason::RuleNotFound,
            ));
            continue;
        };
        debug!(
            "rule sync: found rule {} on {}",
            directive.rule_name, directive.community
        );

        let body = shared_rule_body(found);
        let new_body = if directive.preserve_actions {
            encode_special_characters(&body)
        } else {
            match merge(rule, &body) {
                Ok(merged) => encode_special_characters(&merged),
                Err(err) => {
                    debug!(
                        "rule sync: cannot merge {} from {}: {err}",
                        directive.rule_name, directive.community
                    );
                    results.push(RuleSyncResult::failure(
                        &directive.community,
                        &directive.rule_name,
                        SyncFailureReason::InvalidFormat,
                    ));
                    continue;
                }
            }
        };

        let new_rule = rebuild_included_rule(&directive, &new_body);
        let update_needed = *rule != new_rule;
        if update_needed {
            *rule = new_rule;
        }
        results.push(RuleSyncResult::success(
            &directive.community,
            &directive.rule_name,
            update_needed,
        ));
    }

    if results.iter().any(|result| result.update_needed == Some(true)) {
        if let Err(err) = config.write_config(home, &join_rules(&rules)) {
            info!("rule sync: error writing configuration for {home}: {err}");
            return vec![RuleSyncResult::failure(
                home,
                "",
                SyncFailureReason::ErrorUpdating,
            )];
        }
        info!("rule sync: configuration for {home} has been updated");
    }

    results
}
