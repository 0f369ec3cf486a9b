//! Synchronization of moderation-automation rule configurations between
//! independently administered communities.
//!
//! A community marks a rule with a first-line `#include` directive naming
//! another community and one of its `#share`-published rules. A sync pass
//! fetches the shared rule, merges it over the local copy while restoring
//! locally-set enforcement actions, and rewrites the configuration in place
//! when anything changed.

pub mod blocks;
pub mod config;
pub mod directive;
pub mod document;
pub mod events;
pub mod merge;
pub mod models;
pub mod output;
pub mod report;
pub mod store;
pub mod sync;
pub mod tokens;
