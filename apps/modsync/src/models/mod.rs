//! Shared data types and the crate-wide error type.

pub mod settings;

use thiserror::Error;

/// Errors surfaced by stores and the rule merge engine.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A configuration or page does not exist for the community.
    #[error("not found: {0}")]
    NotFound(String),

    /// A rule block could not be parsed as a structured document.
    #[error("invalid rule format: {0}")]
    Format(String),

    /// The final configuration write failed.
    #[error("error writing configuration: {0}")]
    Write(String),

    /// A sharing settings page could not be produced.
    #[error("invalid sharing settings: {0}")]
    Settings(String),

    /// I/O error from the backing store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
