//! UseCase: フィードの同期
//!
//! ## 責務
//!
//! - リフレッシュサイクル: スクロール状態の取得 → フィード取得 → 丸ごと置換 → 条件付きピン留め
//! - 更新戦略（プッシュ / ポーリング）は起動時に一度だけ選択し、セッション中は変えない
//!
//! ## 設計ノート
//!
//! トリガーごとにリフレッシュを個別のタスクとして起動します。重なったリフレッシュは
//! キャンセルされず、それぞれ完了した時点のスナップショットで上書きされます
//! （毎回フィード全体を取得して置換するため冪等）。取得失敗はログに残すだけで、
//! 次のプッシュイベントまたはポーリングで自然に回復します。

use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{Instant, Interval, MissedTickBehavior},
};

use crate::{
    config::Transport,
    domain::{FeedSource, SyncError},
    infrastructure::{EventStreamSubscription, HttpFeedClient},
};

use super::ScrollAnchor;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Fixed-interval poll timer; the first tick fires one period after creation
#[derive(Debug)]
pub struct PollHandle {
    interval: Interval,
}

impl PollHandle {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Update strategy, chosen once per session
#[derive(Debug)]
pub enum SyncStrategy {
    /// Server-sent events drive refreshes
    Push(EventStreamSubscription),
    /// A fixed interval drives refreshes
    Poll(PollHandle),
}

/// Choose the update strategy for this session.
///
/// `Transport::Auto` opens `GET /events` once; an event-stream response
/// selects push mode and is kept as the first connection.
pub async fn select_strategy(
    transport: Transport,
    client: &HttpFeedClient,
    poll_interval: Duration,
) -> SyncStrategy {
    let strategy = match transport {
        Transport::Poll => SyncStrategy::Poll(PollHandle::new(poll_interval)),
        Transport::Push => SyncStrategy::Push(EventStreamSubscription::spawn(
            client.http().clone(),
            client.events_url(),
            None,
        )),
        Transport::Auto => {
            let events_url = client.events_url();
            match EventStreamSubscription::probe(client.http(), &events_url).await {
                Some(response) => SyncStrategy::Push(EventStreamSubscription::spawn(
                    client.http().clone(),
                    events_url,
                    Some(response),
                )),
                None => SyncStrategy::Poll(PollHandle::new(poll_interval)),
            }
        }
    };

    match &strategy {
        SyncStrategy::Push(_) => tracing::info!("Using push updates from {}", client.events_url()),
        SyncStrategy::Poll(_) => tracing::info!(
            "Using poll updates every {} ms",
            poll_interval.as_millis()
        ),
    }
    strategy
}

/// Keeps the displayed feed in sync with the server
#[derive(Clone)]
pub struct FeedSyncEngine {
    /// FeedSource（サーバー通信の抽象化）
    source: Arc<dyn FeedSource>,
    /// ScrollAnchor（表示面とピン留め）
    anchor: ScrollAnchor,
    /// プッシュモードでイベントが来ない場合に補助的にリフレッシュする間隔
    push_watchdog: Option<Duration>,
}

impl FeedSyncEngine {
    pub fn new(source: Arc<dyn FeedSource>, anchor: ScrollAnchor) -> Self {
        Self {
            source,
            anchor,
            push_watchdog: None,
        }
    }

    /// Refresh when no push event arrived within `window` (off when `None`)
    pub fn with_push_watchdog(mut self, window: Option<Duration>) -> Self {
        self.push_watchdog = window;
        self
    }

    pub fn anchor(&self) -> &ScrollAnchor {
        &self.anchor
    }

    /// Fetch the feed and replace the displayed snapshot.
    ///
    /// The pinned state is read before the fetch and the view is re-pinned
    /// after the replacement only if it was pinned.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let keep_pinned = self.anchor.is_pinned();

        let snapshot = self.source.fetch_feed().await?;

        self.anchor.surface().replace_content(snapshot);
        if keep_pinned {
            self.anchor.pin_to_bottom();
        }
        Ok(())
    }

    /// First load: refresh, then pin unconditionally
    pub async fn initial_load(&self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!("Initial feed load failed: {}", e);
        }
        self.anchor.pin_to_bottom();
    }

    /// Run one refresh in its own task, swallowing failures
    pub fn spawn_refresh(&self) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.refresh().await {
                tracing::debug!("Refresh skipped: {}", e);
            }
        })
    }

    /// Drive refreshes for the rest of the session.
    ///
    /// Returns only if the server ends the push stream.
    pub async fn run(&self, strategy: SyncStrategy) {
        match strategy {
            SyncStrategy::Push(mut subscription) => loop {
                tokio::select! {
                    event = subscription.next_event() => match event {
                        Some(event) if event.is_message() => {
                            self.spawn_refresh();
                        }
                        Some(event) => {
                            tracing::trace!("Ignoring '{}' event", event.event_type);
                        }
                        None => {
                            tracing::info!("Push subscription ended");
                            return;
                        }
                    },
                    _ = watchdog(self.push_watchdog) => {
                        tracing::debug!("No push event received recently, refreshing");
                        self.spawn_refresh();
                    }
                }
            },
            SyncStrategy::Poll(mut handle) => loop {
                handle.tick().await;
                self.spawn_refresh();
            },
        }
    }
}

async fn watchdog(window: Option<Duration>) {
    match window {
        Some(window) => tokio::time::sleep(window).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ComposeDraft, FeedSnapshot, FeedSurface, MockFeedSource},
        ui::MemoryFeedSurface,
    };
    use crate::infrastructure::SseEvent;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - refresh(): 置換が逐語的であること、ピン留めの規則、失敗時の挙動
    // - run(): ポーリングモードの間隔、プッシュモードのウォッチドッグ
    //
    // 【なぜこのテストが必要か】
    // - 上にスクロールして履歴を読んでいるユーザーを、更新で最下部へ引き戻してはいけない
    // - 最下部にいるユーザーは新しいメッセージに追従し続ける必要がある
    // ========================================

    fn feed_of(lines: usize) -> FeedSnapshot {
        FeedSnapshot::new(
            (0..lines)
                .map(|i| format!("<li>message {}</li>", i))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    fn create_test_engine(
        source: impl FeedSource + 'static,
    ) -> (FeedSyncEngine, Arc<MemoryFeedSurface>) {
        let surface = Arc::new(MemoryFeedSurface::with_rows(5));
        let engine = FeedSyncEngine::new(Arc::new(source), ScrollAnchor::new(surface.clone()));
        (engine, surface)
    }

    struct CountingSource {
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl FeedSource for CountingSource {
        async fn fetch_feed(&self) -> Result<FeedSnapshot, SyncError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(feed_of(3))
        }

        async fn post_message(&self, _draft: &ComposeDraft) -> Result<(), SyncError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_refresh_replaces_content_verbatim() {
        // テスト項目: リフレッシュで表示内容がレスポンス本文そのものに置き換わる
        // given (前提条件):
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_feed()
            .times(1)
            .returning(|| Ok(FeedSnapshot::new("<li>a &amp; b</li>\n<li>c</li>")));
        let (engine, surface) = create_test_engine(source);

        // when (操作):
        let result = engine.refresh().await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(surface.snapshot().as_str(), "<li>a &amp; b</li>\n<li>c</li>");
    }

    #[tokio::test]
    async fn test_pinned_view_follows_new_content() {
        // テスト項目: 最下部にいた場合、フィードが伸びても最下部に固定され続ける
        // given (前提条件):
        let mut source = MockFeedSource::new();
        source.expect_fetch_feed().returning(|| Ok(feed_of(40)));
        let (engine, surface) = create_test_engine(source);
        surface.replace_content(feed_of(2)); // ビューポートより短いのでピン留め状態

        // when (操作):
        engine.refresh().await.unwrap();

        // then (期待する結果):
        let m = surface.metrics();
        assert_eq!(m.scroll_top, m.max_scroll_top());
        assert!(m.scroll_top > 0);
    }

    #[tokio::test]
    async fn test_unpinned_view_keeps_scroll_position() {
        // テスト項目: 上にスクロールしていた場合、リフレッシュ後もスクロール位置が変わらない
        // given (前提条件):
        let mut source = MockFeedSource::new();
        source.expect_fetch_feed().returning(|| Ok(feed_of(45)));
        let (engine, surface) = create_test_engine(source);
        surface.replace_content(feed_of(40));
        surface.set_scroll_top(200);
        let before = surface.metrics().scroll_top;

        // when (操作):
        engine.refresh().await.unwrap();
        engine.refresh().await.unwrap();

        // then (期待する結果):
        assert_eq!(surface.metrics().scroll_top, before);
        assert_eq!(surface.snapshot(), feed_of(45));
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent_when_pinned() {
        // テスト項目: フィードが変わらない場合、何度リフレッシュしても表示と位置はずれない
        // given (前提条件):
        let mut source = MockFeedSource::new();
        source.expect_fetch_feed().times(3).returning(|| Ok(feed_of(30)));
        let (engine, surface) = create_test_engine(source);
        engine.refresh().await.unwrap();
        engine.anchor().pin_to_bottom();
        let snapshot = surface.snapshot();
        let metrics = surface.metrics();

        // when (操作):
        engine.refresh().await.unwrap();
        engine.refresh().await.unwrap();

        // then (期待する結果):
        assert_eq!(surface.snapshot(), snapshot);
        assert_eq!(surface.metrics(), metrics);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_feed_untouched() {
        // テスト項目: 取得に失敗した場合は FetchFailed を返し、表示は変わらない
        // given (前提条件):
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_feed()
            .returning(|| Err(SyncError::FetchFailed("unexpected status 500".to_string())));
        let (engine, surface) = create_test_engine(source);
        surface.replace_content(feed_of(10));
        surface.set_scroll_top(20);

        // when (操作):
        let result = engine.refresh().await;

        // then (期待する結果):
        assert!(matches!(result, Err(SyncError::FetchFailed(_))));
        assert_eq!(surface.snapshot(), feed_of(10));
        assert_eq!(surface.metrics().scroll_top, 20);
    }

    #[tokio::test]
    async fn test_initial_load_pins_even_when_fetch_fails() {
        // テスト項目: 初回表示は取得に失敗しても無条件に最下部へ固定する
        // given (前提条件):
        let mut source = MockFeedSource::new();
        source
            .expect_fetch_feed()
            .returning(|| Err(SyncError::FetchFailed("connection refused".to_string())));
        let (engine, surface) = create_test_engine(source);
        surface.replace_content(feed_of(30));

        // when (操作):
        engine.initial_load().await;

        // then (期待する結果):
        let m = surface.metrics();
        assert_eq!(m.scroll_top, m.max_scroll_top());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_mode_refreshes_every_interval() {
        // テスト項目: ポーリングモードは開始直後ではなく、間隔ごとにリフレッシュする
        // given (前提条件):
        let fetches = Arc::new(AtomicUsize::new(0));
        let (engine, _surface) = create_test_engine(CountingSource {
            fetches: fetches.clone(),
        });
        let strategy = SyncStrategy::Poll(PollHandle::new(DEFAULT_POLL_INTERVAL));

        // when (操作):
        let runner = tokio::spawn(async move { engine.run(strategy).await });
        tokio::time::sleep(Duration::from_millis(4_900)).await;
        let before_first_tick = fetches.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10_200)).await;
        let after_three_ticks = fetches.load(Ordering::SeqCst);

        // then (期待する結果):
        assert_eq!(before_first_tick, 0);
        assert_eq!(after_three_ticks, 3);
        runner.abort();
    }

    fn message_event(data: &str) -> SseEvent {
        SseEvent {
            event_type: "message".to_string(),
            data: data.to_string(),
            last_event_id: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_watchdog_refreshes_once_after_silent_window() {
        // テスト項目: プッシュイベントが届かないままウォッチドッグの時間が過ぎると、ちょうど 1 回だけリフレッシュする
        // given (前提条件):
        let fetches = Arc::new(AtomicUsize::new(0));
        let (engine, _surface) = create_test_engine(CountingSource {
            fetches: fetches.clone(),
        });
        let engine = engine.with_push_watchdog(Some(Duration::from_secs(30)));
        let (_events_tx, events_rx) = mpsc::unbounded_channel();
        let strategy = SyncStrategy::Push(EventStreamSubscription::from_receiver(events_rx));

        // when (操作):
        let runner = tokio::spawn(async move { engine.run(strategy).await });
        tokio::time::sleep(Duration::from_millis(29_900)).await;
        let before_window = fetches.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(600)).await;
        let after_window = fetches.load(Ordering::SeqCst);

        // then (期待する結果):
        assert_eq!(before_window, 0);
        assert_eq!(after_window, 1);
        runner.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_event_refreshes_and_restarts_watchdog() {
        // テスト項目: message イベントごとにリフレッシュし、ウォッチドッグの計測はイベント受信時点からやり直す
        // given (前提条件):
        let fetches = Arc::new(AtomicUsize::new(0));
        let (engine, _surface) = create_test_engine(CountingSource {
            fetches: fetches.clone(),
        });
        let engine = engine.with_push_watchdog(Some(Duration::from_secs(30)));
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let strategy = SyncStrategy::Push(EventStreamSubscription::from_receiver(events_rx));
        let runner = tokio::spawn(async move { engine.run(strategy).await });

        // when (操作):
        tokio::time::sleep(Duration::from_secs(20)).await;
        events_tx.send(message_event("1")).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let after_event = fetches.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(15)).await; // 開始から 35 秒、イベントから 15 秒
        let after_original_window = fetches.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(15)).await; // イベントから 30 秒超
        let after_restarted_window = fetches.load(Ordering::SeqCst);

        // then (期待する結果):
        assert_eq!(after_event, 1);
        assert_eq!(after_original_window, 1);
        assert_eq!(after_restarted_window, 2);
        runner.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_without_watchdog_waits_for_events() {
        // テスト項目: ウォッチドッグ無しのプッシュモードは、イベントが来ない限りリフレッシュせず、ストリーム終了で戻る
        // given (前提条件):
        let fetches = Arc::new(AtomicUsize::new(0));
        let (engine, _surface) = create_test_engine(CountingSource {
            fetches: fetches.clone(),
        });
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let strategy = SyncStrategy::Push(EventStreamSubscription::from_receiver(events_rx));
        let runner = tokio::spawn(async move { engine.run(strategy).await });

        // when (操作):
        tokio::time::sleep(Duration::from_secs(600)).await;
        let idle_fetches = fetches.load(Ordering::SeqCst);
        drop(events_tx);
        let ended = tokio::time::timeout(Duration::from_secs(1), runner).await;

        // then (期待する結果):
        assert_eq!(idle_fetches, 0);
        assert!(ended.is_ok());
    }
}
