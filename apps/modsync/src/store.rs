//! Capability interfaces for configuration, settings, and notification, plus
//! filesystem-backed implementations.
//!
//! A community is a directory under the store root. The live rule
//! configuration is the `rules.conf` page, sharing settings live in
//! `sharing.json`, and alternate rule pages are arbitrary files in the same
//! directory.

use crate::models::settings::SharingSettings;
use crate::models::SyncError;
use crate::sync::RuleSyncResult;
use log::warn;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Name of the page holding a community's live rule configuration.
pub const CONFIG_PAGE: &str = "rules.conf";

/// Name of the page holding a community's sharing settings.
pub const SETTINGS_PAGE: &str = "sharing.json";

/// Read and write access to community rule configuration pages.
pub trait ConfigStore: Sync {
    /// Fetch the live rule configuration. `SyncError::NotFound` when the
    /// community has no configuration.
    fn fetch_config(&self, community: &str) -> Result<String, SyncError>;

    /// Fetch an auxiliary page by name.
    fn fetch_page(&self, community: &str, page: &str) -> Result<String, SyncError>;

    /// Overwrite the live rule configuration. Fails when the configuration
    /// was never initialized for the community.
    fn write_config(&self, community: &str, content: &str) -> Result<(), SyncError>;
}

/// Read access to per-community sharing settings.
pub trait SettingsStore: Sync {
    /// Sharing settings for a community; the no-sharing default on any
    /// retrieval or validation failure.
    fn fetch_sharing_settings(&self, community: &str) -> SharingSettings;
}

/// Best-effort delivery of sync summaries to the invoking actor.
pub trait Notifier {
    fn notify(&self, recipient: &str, community: &str, results: &[RuleSyncResult]);
}

/// Filesystem store rooted at a directory of community subdirectories.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn page_path(&self, community: &str, page: &str) -> PathBuf {
        self.root.join(community.to_lowercase()).join(page)
    }

    /// Write a community's sharing settings page, creating the community
    /// directory if needed. Lists are stored normalized.
    pub fn write_sharing_settings(
        &self,
        community: &str,
        settings: SharingSettings,
    ) -> Result<(), SyncError> {
        let settings = settings.normalized();
        let path = self.page_path(community, SETTINGS_PAGE);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(&settings)
            .map_err(|err| SyncError::Settings(err.to_string()))?;
        Ok(fs::write(&path, body)?)
    }
}

impl ConfigStore for FsStore {
    fn fetch_config(&self, community: &str) -> Result<String, SyncError> {
        self.fetch_page(community, CONFIG_PAGE)
    }

    fn fetch_page(&self, community: &str, page: &str) -> Result<String, SyncError> {
        let path = self.page_path(community, page);
        if !path.exists() {
            return Err(SyncError::NotFound(format!("{community}/{page}")));
        }
        Ok(fs::read_to_string(&path)?)
    }

    fn write_config(&self, community: &str, content: &str) -> Result<(), SyncError> {
        let path = self.page_path(community, CONFIG_PAGE);
        if !path.exists() {
            return Err(SyncError::Write(format!(
                "configuration is not initialized for {community}"
            )));
        }
        fs::write(&path, content).map_err(|err| SyncError::Write(err.to_string()))
    }
}

impl SettingsStore for FsStore {
    fn fetch_sharing_settings(&self, community: &str) -> SharingSettings {
        let path = self.page_path(community, SETTINGS_PAGE);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return SharingSettings::default(),
        };
        match serde_json::from_str::<SharingSettings>(&raw) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("sharing settings for {community} are invalid: {err}");
                SharingSettings::default()
            }
        }
    }
}

/// Store wrapper that forwards reads and records writes instead of applying
/// them. Used by `sync --dry-run`.
pub struct DryRunStore<'a, S: ConfigStore> {
    inner: &'a S,
    written: Mutex<Vec<(String, String)>>,
}

impl<'a, S: ConfigStore> DryRunStore<'a, S> {
    pub fn new(inner: &'a S) -> Self {
        Self {
            inner,
            written: Mutex::new(Vec::new()),
        }
    }

    /// The `(community, content)` writes the pass would have made.
    pub fn written(&self) -> Vec<(String, String)> {
        self.written.lock().unwrap().clone()
    }
}

impl<S: ConfigStore> ConfigStore for DryRunStore<'_, S> {
    fn fetch_config(&self, community: &str) -> Result<String, SyncError> {
        self.inner.fetch_config(community)
    }

    fn fetch_page(&self, community: &str, page: &str) -> Result<String, SyncError> {
        self.inner.fetch_page(community, page)
    }

    fn write_config(&self, community: &str, content: &str) -> Result<(), SyncError> {
        self.written
            .lock()
            .unwrap()
            .push((community.to_string(), content.to_string()));
        Ok(())
    }
}
