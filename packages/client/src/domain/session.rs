//! Client identity and the compose payload.

use serde::Serialize;

/// Stable per-store identifier attributed to submitted messages
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Create a client ID, rejecting blank values
    pub fn new(value: String) -> Result<Self, String> {
        if value.trim().is_empty() {
            return Err("Client ID must not be empty".to_string());
        }
        Ok(Self(value))
    }

    /// Wrap a freshly generated token, which is never blank
    pub(crate) fn generated(value: String) -> Self {
        debug_assert!(!value.trim().is_empty());
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Who is posting: the persisted identity plus the current nickname
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSession {
    pub client_id: ClientId,
    /// May be empty
    pub nickname: String,
}

/// One submission payload, sent as `application/x-www-form-urlencoded`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposeDraft {
    pub message: String,
    pub client_id: ClientId,
    pub nickname: String,
}

impl ComposeDraft {
    pub fn new(message: impl Into<String>, session: ClientSession) -> Self {
        Self {
            message: message.into(),
            client_id: session.client_id,
            nickname: session.nickname,
        }
    }
}
