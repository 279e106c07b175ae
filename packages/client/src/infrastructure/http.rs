//! reqwest を使った FeedSource 実装
//!
//! ## 責務
//!
//! - `GET /messages` でフィード全体を取得
//! - `POST /post` でフォームエンコードされたメッセージを投稿
//!
//! どちらのリクエストにも `X-Requested-With: fetch` を付け、
//! ページ遷移ではなくプログラムからのリクエストであることをサーバーに伝えます。

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::domain::{ClientError, ComposeDraft, FeedSnapshot, FeedSource, SyncError};

/// Header marking a request as programmatic rather than a navigation
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "fetch";

const MESSAGES_PATH: &str = "messages";
const POST_PATH: &str = "post";
const EVENTS_PATH: &str = "events";

/// HTTP client for the chat server endpoints
#[derive(Debug, Clone)]
pub struct HttpFeedClient {
    client: Client,
    base_url: Url,
}

impl HttpFeedClient {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:8080`)
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute http(s) URL or the
    /// underlying HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder().build()?;
        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let mut url =
            Url::parse(base_url).map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        // Url::join replaces the last path segment unless the base ends in '/'
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            client,
            base_url: url,
        })
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn messages_url(&self) -> Url {
        self.endpoint(MESSAGES_PATH)
    }

    pub fn post_url(&self) -> Url {
        self.endpoint(POST_PATH)
    }

    pub fn events_url(&self) -> Url {
        self.endpoint(EVENTS_PATH)
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}{}", url.path(), path);
        url.set_path(&joined);
        url
    }
}

#[async_trait]
impl FeedSource for HttpFeedClient {
    async fn fetch_feed(&self) -> Result<FeedSnapshot, SyncError> {
        let response = self
            .client
            .get(self.messages_url())
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .send()
            .await
            .map_err(|e| SyncError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::FetchFailed(format!("unexpected status {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SyncError::FetchFailed(e.to_string()))?;
        Ok(FeedSnapshot::new(body))
    }

    async fn post_message(&self, draft: &ComposeDraft) -> Result<(), SyncError> {
        let response = self
            .client
            .post(self.post_url())
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .form(draft)
            .send()
            .await
            .map_err(|e| SyncError::PostFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::PostFailed(format!("unexpected status {}", status)));
        }

        tracing::debug!(
            "Posted message as '{}' ({} bytes)",
            draft.client_id.as_str(),
            draft.message.len()
        );
        Ok(())
    }
}
