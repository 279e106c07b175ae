//! Port trait 定義
//!
//! ユースケース層が必要とする外部とのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層と UI 層が提供します（依存性の逆転）。
//!
//! ## 依存性の逆転（DIP）
//!
//! - HTTP、永続ストア、表示面はすべてこのモジュールの trait 越しに扱う
//! - テストではインメモリ実装やモックに差し替える

use async_trait::async_trait;

use super::{
    ClientId, ComposeDraft, FeedSnapshot, ScrollMetrics, StoreError, SubmissionStatus, SyncError,
    Theme,
};

/// チャットサーバーとの通信
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// 現在のフィード全体を取得（`GET /messages`）
    async fn fetch_feed(&self) -> Result<FeedSnapshot, SyncError>;

    /// メッセージを投稿（`POST /post`）
    async fn post_message(&self, draft: &ComposeDraft) -> Result<(), SyncError>;
}

/// フィードを表示するスクロール可能な領域
///
/// 実装はコンテンツや高さが変わるたびに `scroll_top` を
/// `[0, scroll_height - client_height]` に収める。
pub trait FeedSurface: Send + Sync {
    /// 現在のスクロール位置と高さ
    fn metrics(&self) -> ScrollMetrics;

    /// スクロール位置を設定（範囲外の値は丸められる）
    fn set_scroll_top(&self, scroll_top: u32);

    /// 表示中のフィードをスナップショットで丸ごと置き換え
    fn replace_content(&self, snapshot: FeedSnapshot);

    /// 表示中のスナップショット
    fn snapshot(&self) -> FeedSnapshot;
}

/// 永続キーバリューストア
///
/// キーが存在しないことはエラーではなく「未設定」を意味する。
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// 即座に永続化する（バッチ処理しない）
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// 全てのキーを削除
    fn clear(&self) -> Result<(), StoreError>;
}

/// OS が報告する配色の好み
pub trait ColorSchemeProbe: Send + Sync {
    fn prefers_dark(&self) -> bool;
}

/// 現在のテーマの表示（トグルボタンのラベルなど）
pub trait ThemeIndicator: Send + Sync {
    fn show_theme(&self, theme: Theme);
}

/// 投稿状態の表示
pub trait StatusIndicator: Send + Sync {
    fn set_status(&self, status: SubmissionStatus);
}

/// クライアント ID の生成器
///
/// 乱数源が使えない場合は `None` を返す。呼び出し側はフォールバック生成器に切り替える。
pub trait ClientIdGenerator: Send + Sync {
    fn try_generate(&self) -> Option<ClientId>;
}
