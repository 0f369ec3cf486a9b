//! Output rendering for sync results.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-result fields and a top-level summary.

use crate::report::pluralize;
use crate::sync::RuleSyncResult;
use owo_colors::OwoColorize;
use serde_json::json;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print sync results in the requested format.
pub fn print_sync(results: &[RuleSyncResult], output: &str) {
    let updated = results
        .iter()
        .filter(|r| r.update_needed == Some(true))
        .count();
    let failed = results.iter().filter(|r| !r.success).count();

    match output {
        "json" => {
            let summary = json!({
                "synced": results.len() - failed,
                "updated": updated,
                "failed": failed,
                "total": results.len(),
            });
            let out = json!({"results": results, "summary": summary});
            println!("{}", serde_json::to_string_pretty(&out).unwrap());
        }
        _ => {
            let color = use_colors(output);
            for result in results {
                if !result.success {
                    let reason = result
                        .reason
                        .map(|reason| reason.label())
                        .unwrap_or("failed");
                    if color {
                        println!(
                            "{} {} \"{}\" ({})",
                            "❌ failed:".red().bold(),
                            result.community,
                            result.rule_name,
                            reason
                        );
                    } else {
                        println!(
                            "❌ failed: {} \"{}\" ({})",
                            result.community, result.rule_name, reason
                        );
                    }
                } else if result.update_needed == Some(true) {
                    if color {
                        println!(
                            "{} {} \"{}\"",
                            "📥 synced:".green().bold(),
                            result.community,
                            result.rule_name
                        );
                    } else {
                        println!("📥 synced: {} \"{}\"", result.community, result.rule_name);
                    }
                } else {
                    if color {
                        println!(
                            "{} {} \"{}\"",
                            "no changes:".bright_black().to_string(),
                            result.community,
                            result.rule_name
                        );
                    } else {
                        println!("no changes: {} \"{}\"", result.community, result.rule_name);
                    }
                }
            }

            let summary = if failed == 0 && updated > 0 {
                format!(
                    "Configuration updated. {updated} {} synchronized.",
                    pluralize("rule", updated)
                )
            } else if failed == 0 {
                "Synchronised rules are already up to date, no changes made.".to_string()
            } else {
                format!(
                    "{} {} synchronized, {failed} failed to sync.",
                    results.len() - failed,
                    pluralize("rule", results.len() - failed)
                )
            };
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{summary}");
            }
        }
    }
}
