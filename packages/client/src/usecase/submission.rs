//! UseCase: メッセージ投稿処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmissionFlow::submit() メソッド
//! - 投稿状態の表示、下書きの扱い、投稿後のリフレッシュとピン留め
//!
//! ### なぜこのテストが必要か
//! - 投稿に失敗した場合、ユーザーが再送できるよう下書きを残す必要がある
//! - 自分の投稿は、スクロール位置に関わらず必ず見える位置に表示される必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：投稿 → 入力欄クリア → リフレッシュ → 最下部へ固定
//! - 異常系：投稿失敗（リフレッシュしない）
//! - エッジケース：投稿は成功したがリフレッシュに失敗

use std::sync::Arc;

use crate::domain::{ComposeDraft, FeedSource, StatusIndicator, SubmissionStatus, SyncError};

use super::{ClientIdentity, ComposeBox, ComposeKey, FeedSyncEngine, KeyAction, PreferenceStore};

/// メッセージ投稿のユースケース
pub struct SubmissionFlow {
    /// FeedSource（サーバー通信の抽象化）
    source: Arc<dyn FeedSource>,
    /// 投稿後のリフレッシュに使うエンジン
    engine: FeedSyncEngine,
    identity: Arc<ClientIdentity>,
    preferences: Arc<PreferenceStore>,
    compose: Arc<ComposeBox>,
    status: Arc<dyn StatusIndicator>,
}

impl SubmissionFlow {
    pub fn new(
        source: Arc<dyn FeedSource>,
        engine: FeedSyncEngine,
        identity: Arc<ClientIdentity>,
        preferences: Arc<PreferenceStore>,
        compose: Arc<ComposeBox>,
        status: Arc<dyn StatusIndicator>,
    ) -> Self {
        Self {
            source,
            engine,
            identity,
            preferences,
            compose,
            status,
        }
    }

    pub fn compose(&self) -> &Arc<ComposeBox> {
        &self.compose
    }

    /// Post the current draft.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 投稿成功（入力欄はクリアされ、フィードは最下部に固定）
    /// * `Err(SyncError::PostFailed)` - 投稿失敗（下書きはそのまま残る）
    pub async fn submit(&self) -> Result<(), SyncError> {
        // 1. ネットワークの完了を待たずに投稿中であることを表示
        self.status.set_status(SubmissionStatus::Posting);

        // 2. 下書きとセッション情報から送信内容を組み立てる
        let session = self.identity.session(&self.preferences);
        let draft = ComposeDraft::new(self.compose.text(), session);

        // 3. 投稿
        if let Err(e) = self.source.post_message(&draft).await {
            tracing::warn!("{}", e);
            self.status.set_status(SubmissionStatus::Failed);
            return Err(e);
        }

        // 4. 入力欄をクリアしてフィードを更新し、自分の投稿が見えるよう無条件に固定
        self.compose.clear();
        if let Err(e) = self.engine.refresh().await {
            tracing::debug!("Refresh after post failed: {}", e);
        }
        self.engine.anchor().pin_to_bottom();

        self.status.set_status(SubmissionStatus::Posted);
        Ok(())
    }

    /// Route a key press; Enter without Shift submits
    pub async fn handle_key(&self, key: ComposeKey) -> Option<Result<(), SyncError>> {
        match self.compose.handle_key(key) {
            KeyAction::Submit => Some(self.submit().await),
            KeyAction::Edited => None,
        }
    }
}
