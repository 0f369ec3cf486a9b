//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "modsync", version, about = "Shared moderation-rule synchronization")]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for synchronizing rules and publishing settings.
pub enum Commands {
    /// Show version
    Version,
    /// Synchronize included rules for a community
    Sync {
        #[arg(long)]
        store_root: Option<String>,
        #[arg(long)]
        community: Option<String>,
        #[arg(long)]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Skip the pass when the configuration is unchanged")]
        if_changed: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Report planned writes without changing the store")]
        dry_run: bool,
    },
    /// Publish a community's sharing settings page
    Settings {
        #[arg(long)]
        store_root: Option<String>,
        #[arg(long)]
        community: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Share rules with any community")]
        enable_sharing_to_all: bool,
        #[arg(long, value_delimiter = ',', help = "Communities to share with")]
        share_with: Vec<String>,
        #[arg(long, value_delimiter = ',', help = "Additional pages holding shareable rules")]
        alternate_pages: Vec<String>,
    },
}
