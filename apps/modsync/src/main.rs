//! Modsync CLI binary entry point.
//! Delegates to the library for the sync pass and prints results.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use modsync::config;
use modsync::events::{sync_if_changed, FsRevisionCursor};
use modsync::models::settings::SharingSettings;
use modsync::output;
use modsync::report::ConsoleNotifier;
use modsync::store::{DryRunStore, FsStore};
use modsync::sync::{sync_community, SyncFailureReason};
use owo_colors::OwoColorize;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Sync {
            store_root,
            community,
            output,
            if_changed,
            dry_run,
        } => {
            let eff = config::resolve_effective(
                store_root.as_deref(),
                community.as_deref(),
                output.as_deref(),
            );
            let Some(community) = eff.community else {
                eprintln!(
                    "{} {}",
                    "❌ error:".red().bold(),
                    "No community given (pass --community or configure modsync.toml)"
                );
                std::process::exit(2);
            };
            let community_dir = eff.store_root.join(community.to_lowercase());
            if !community_dir.exists() {
                eprintln!(
                    "{} {}",
                    "❌ error:".red().bold(),
                    format!(
                        "Community not found in store: {} (pass --store-root or configure modsync.toml)",
                        community_dir.to_string_lossy()
                    )
                );
                std::process::exit(2);
            }

            let store = FsStore::new(&eff.store_root);
            let actor = std::env::var("USER").unwrap_or_else(|_| "moderator".to_string());

            let results = if dry_run {
                let dry = DryRunStore::new(&store);
                let results = sync_community(&community, &dry, &store);
                for (community, _) in dry.written() {
                    println!("would write configuration for {community}");
                }
                results
            } else if if_changed {
                let cursor = FsRevisionCursor::new(&eff.store_root);
                match sync_if_changed(
                    &community,
                    &store,
                    &store,
                    &cursor,
                    &ConsoleNotifier,
                    &actor,
                ) {
                    Some(results) => results,
                    None => {
                        println!("no changes: configuration already processed");
                        return;
                    }
                }
            } else {
                sync_community(&community, &store, &store)
            };

            output::print_sync(&results, &eff.output);
            if results
                .iter()
                .any(|r| !r.success && r.reason != Some(SyncFailureReason::NoIncludes))
            {
                std::process::exit(1);
            }
        }
        Commands::Settings {
            store_root,
            community,
            enable_sharing_to_all,
            share_with,
            alternate_pages,
        } => {
            let eff = config::resolve_effective(store_root.as_deref(), community.as_deref(), None);
            let Some(community) = eff.community else {
                eprintln!(
                    "{} {}",
                    "❌ error:".red().bold(),
                    "No community given (pass --community or configure modsync.toml)"
                );
                std::process::exit(2);
            };

            let store = FsStore::new(&eff.store_root);
            let settings = SharingSettings {
                enable_sharing_to_all,
                sub_list: share_with,
                alternate_wiki_pages: alternate_pages,
            };
            match store.write_sharing_settings(&community, settings) {
                Ok(()) => {
                    println!(
                        "{} {}",
                        "✏️  published:".green().bold(),
                        format!("sharing settings for {community}")
                    );
                }
                Err(err) => {
                    eprintln!(
                        "{} {}",
                        "❌ error:".red().bold(),
                        format!("Failed to write sharing settings for {community}: {err}")
                    );
                    std::process::exit(1);
                }
            }
        }
    }
}
