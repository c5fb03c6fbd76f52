//! Errors raised by storage backends.

use crate::config::SnapshotKey;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store cannot be reached (no window, storage disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A filesystem read or write failed.
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be encoded or decoded as JSON.
    #[error("snapshot encoding failed for {key:?}: {source}")]
    Encode {
        key: SnapshotKey,
        #[source]
        source: serde_json::Error,
    },

    /// The browser rejected a storage call (quota exceeded, security error).
    #[error("browser storage error: {0}")]
    Browser(String),
}

impl StoreError {
    /// Stable machine-readable code, for logs and CLI exit messages.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "E_STORE_UNAVAILABLE",
            Self::Io(_) => "E_STORE_IO",
            Self::Encode { .. } => "E_STORE_ENCODE",
            Self::Browser(_) => "E_STORE_BROWSER",
        }
    }
}
