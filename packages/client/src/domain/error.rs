//! Error types for the chat feed client.

use thiserror::Error;

/// Errors raised by the feed synchronization and submission flows.
///
/// Both kinds are recovered locally: a failed fetch waits for the next
/// push event or poll tick, a failed post is reported to the user who
/// retries by hand.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Feed retrieval failed
    #[error("Failed to fetch messages: {0}")]
    FetchFailed(String),

    /// Message submission failed
    #[error("Post failed: {0}")]
    PostFailed(String),
}

/// Persistent store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored map could not be serialized
    #[error("Store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Client startup errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured server URL cannot be used
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
