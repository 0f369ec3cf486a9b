//! Sharing settings schema stored on each community's settings page.

use serde::{Deserialize, Serialize};

/// Per-community sharing permissions and auxiliary rule page names.
///
/// Stored as JSON on the community's settings page. All three fields are
/// required on read; a page that fails to deserialize is treated as the
/// no-sharing default by the settings store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingSettings {
    pub enable_sharing_to_all: bool,
    pub sub_list: Vec<String>,
    pub alternate_wiki_pages: Vec<String>,
}

impl SharingSettings {
    /// True when `community` may read this community's shared rules.
    pub fn allows(&self, community: &str) -> bool {
        self.enable_sharing_to_all
            || self
                .sub_list
                .iter()
                .any(|sub| sub.eq_ignore_ascii_case(community))
    }

    /// Normalize the lists the way the settings writer stores them:
    /// lowercased, trimmed, empty entries dropped.
    pub fn normalized(self) -> Self {
        let clean = |list: Vec<String>| {
            list.into_iter()
                .map(|entry| entry.trim().to_lowercase())
                .filter(|entry| !entry.is_empty())
                .collect()
        };
        Self {
            enable_sharing_to_all: self.enable_sharing_to_all,
            sub_list: clean(self.sub_list),
            alternate_wiki_pages: clean(self.alternate_wiki_pages),
        }
    }
}
