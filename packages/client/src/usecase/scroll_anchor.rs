//! UseCase: スクロール位置の固定（ピン留め）
//!
//! 呼び出し側は、フィードを書き換える **前** に `is_pinned()` を読み、
//! その結果が true だった場合のみ書き換え **後** に `pin_to_bottom()` を呼ぶ。
//! 履歴を読むために上へスクロールしたユーザーをバックグラウンドの更新で
//! 引き戻さないための規則です。初回表示と自分の投稿直後は無条件に固定します。

use std::sync::Arc;

use crate::domain::FeedSurface;

#[derive(Clone)]
pub struct ScrollAnchor {
    surface: Arc<dyn FeedSurface>,
}

impl ScrollAnchor {
    pub fn new(surface: Arc<dyn FeedSurface>) -> Self {
        Self { surface }
    }

    /// True iff the viewport is within the pin threshold of the bottom
    pub fn is_pinned(&self) -> bool {
        self.surface.metrics().is_near_bottom()
    }

    /// Scroll to the bottom edge
    pub fn pin_to_bottom(&self) {
        let metrics = self.surface.metrics();
        self.surface.set_scroll_top(metrics.max_scroll_top());
    }

    pub fn surface(&self) -> &Arc<dyn FeedSurface> {
        &self.surface
    }
}
