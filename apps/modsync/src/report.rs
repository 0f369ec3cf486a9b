//! Human-readable summaries of sync results.

use crate::store::Notifier;
use crate::sync::{RuleSyncResult, SyncFailureReason};

/// Singular or plural form of a counted noun.
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// Build the failure summary delivered to the invoking actor after a pass
/// with one or more failed rules.
pub fn results_message(recipient: &str, community: &str, results: &[RuleSyncResult]) -> String {
    let mut message = format!(
        "Hi {recipient},\n\nRule sync failed to synchronise one or more rules on {community}.\n\n"
    );

    if results
        .iter()
        .any(|result| result.reason == Some(SyncFailureReason::NoIncludes))
    {
        message.push_str("* ❌ No #include directives were found in the rule configuration\n\n");
    } else if results
        .iter()
        .any(|result| result.reason == Some(SyncFailureReason::ErrorUpdating))
    {
        message.push_str("* ❌ An error occurred when trying to write the rule configuration.\n\n");
    } else {
        let mut sources: Vec<&str> = Vec::new();
        for result in results {
            if !sources.contains(&result.community.as_str()) {
                sources.push(&result.community);
            }
        }
        for source in sources {
            message.push_str(&format!("* {source}\n\n"));
            let source_results: Vec<&RuleSyncResult> = results
                .iter()
                .filter(|result| result.community == source)
                .collect();
            if source_results
                .iter()
                .any(|result| result.reason == Some(SyncFailureReason::NotSharing))
            {
                message.push_str(
                    "  * ❌ Community is not configured to share rules with this one.\n\n",
                );
            } else {
                for result in source_results {
                    if result.success {
                        message.push_str(&format!("  * \"{}\": ✔️ Success\n", result.rule_name));
                    }
                    match result.reason {
                        Some(SyncFailureReason::RuleNotFound) => {
                            message.push_str(&format!(
                                "  * \"{}\": ❌ Rule not found in community\n",
                                result.rule_name
                            ));
                        }
                        Some(SyncFailureReason::InvalidFormat) => {
                            message.push_str(&format!(
                                "  * \"{}\": ❌ Rule could not be parsed\n",
                                result.rule_name
                            ));
                        }
                        _ => {}
                    }
                }
                message.push('\n');
            }
        }
    }

    message
}

/// Notifier printing summaries to standard output.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, recipient: &str, community: &str, results: &[RuleSyncResult]) {
        println!("{}", results_message(recipient, community, results));
    }
}
