//! Edit-triggered synchronization with a de-duplication cursor.
//!
//! An external edit notification can fire more than once for the same
//! configuration revision. The cursor records a fingerprint of the last
//! processed configuration so a pass only runs when the content actually
//! changed.

use crate::store::{ConfigStore, Notifier, SettingsStore};
use crate::sync::{sync_community, RuleSyncResult, SyncFailureReason};
use log::info;
use std::fs;
use std::path::PathBuf;

/// Last-processed revision tracking per community.
pub trait RevisionCursor {
    fn last_processed(&self, community: &str) -> Option<String>;
    fn set_last_processed(&self, community: &str, revision: &str);
}

/// Cursor persisted as a dot-file per community under the store root.
pub struct FsRevisionCursor {
    root: PathBuf,
}

impl FsRevisionCursor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn cursor_path(&self, community: &str) -> PathBuf {
        self.root
            .join(format!(".modsync-cursor-{}", community.to_lowercase()))
    }
}

impl RevisionCursor for FsRevisionCursor {
    fn last_processed(&self, community: &str) -> Option<String> {
        fs::read_to_string(self.cursor_path(community)).ok()
    }

    fn set_last_processed(&self, community: &str, revision: &str) {
        // Best-effort, like the notifier: a lost cursor only costs an extra pass.
        let _ = fs::write(self.cursor_path(community), revision);
    }
}

/// Content fingerprint used as a revision id.
pub fn fingerprint(content: &str) -> String {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}-{}", hasher.finish(), content.len())
}

/// Run a sync pass for `home` only when its configuration changed since the
/// last processed revision. Returns `None` when the pass was skipped.
///
/// Failures other than `NoIncludes` are summarized to `actor` through the
/// notifier. The cursor is set to the post-pass revision so the write made by
/// the pass itself does not trigger another one.
pub fn sync_if_changed<C, S>(
    home: &str,
    config: &C,
    settings: &S,
    cursor: &dyn RevisionCursor,
    notifier: &dyn Notifier,
    actor: &str,
) -> Option<Vec<RuleSyncResult>>
where
    C: ConfigStore,
    S: SettingsStore,
{
    let current = match config.fetch_config(home) {
        Ok(text) => fingerprint(&text),
        Err(_) => return None,
    };
    if cursor.last_processed(home).as_deref() == Some(current.as_str()) {
        info!("edit trigger: configuration for {home} has not changed");
        return None;
    }

    let results = sync_community(home, config, settings);
    if results
        .iter()
        .any(|result| !result.success && result.reason != Some(SyncFailureReason::NoIncludes))
    {
        info!("edit trigger: one or more rules failed to synchronise on {home}");
        notifier.notify(actor, home, &results);
    }

    if let Ok(text) = config.fetch_config(home) {
        cursor.set_last_processed(home, &fingerprint(&text));
    }
    Some(results)
}
