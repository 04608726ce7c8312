//! Error taxonomy surfaced by portfolio operations.

use thiserror::Error;

pub const LOAD_ASSETS_FAILED: &str = "Failed to load assets. Backend might be down.";
pub const LOAD_PRICES_FAILED: &str = "Failed to load live prices. Some features may be limited.";

/// Every variant carries the display string shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FolioError {
    /// Rejected locally, the remote store was never contacted.
    #[error("{0}")]
    Validation(String),
    /// Listing assets or fetching prices failed.
    #[error("{0}")]
    Load(String),
    /// Create, update or delete was rejected by the remote store.
    #[error("{0}")]
    Write(String),
}

impl FolioError {
    pub fn validation(message: impl Into<String>) -> Self {
        FolioError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FolioError::Validation(_))
    }
}
