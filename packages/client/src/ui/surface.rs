//! In-memory feed surface.
//!
//! Models a scroll container holding the feed snapshot as lines of a fixed
//! pixel height. Used directly in tests and wrapped by the terminal view.

use std::sync::{Mutex, MutexGuard};

use crate::domain::{FeedSnapshot, FeedSurface, ScrollMetrics};

pub const DEFAULT_LINE_HEIGHT_PX: u32 = 20;

#[derive(Debug)]
struct SurfaceState {
    snapshot: FeedSnapshot,
    scroll_top: u32,
    client_height: u32,
    line_height: u32,
}

impl SurfaceState {
    fn metrics(&self) -> ScrollMetrics {
        let content_height = u32::try_from(self.snapshot.line_count())
            .unwrap_or(u32::MAX)
            .saturating_mul(self.line_height);
        ScrollMetrics {
            scroll_height: content_height.max(self.client_height),
            scroll_top: self.scroll_top,
            client_height: self.client_height,
        }
    }

    fn clamp(&mut self) {
        self.scroll_top = self.scroll_top.min(self.metrics().max_scroll_top());
    }
}

#[derive(Debug)]
pub struct MemoryFeedSurface {
    state: Mutex<SurfaceState>,
}

impl MemoryFeedSurface {
    /// Surface with a viewport of `client_height` pixels
    pub fn new(client_height: u32, line_height: u32) -> Self {
        Self {
            state: Mutex::new(SurfaceState {
                snapshot: FeedSnapshot::default(),
                scroll_top: 0,
                client_height,
                line_height: line_height.max(1),
            }),
        }
    }

    /// Surface showing `rows` lines at the default line height
    pub fn with_rows(rows: u32) -> Self {
        Self::new(rows.saturating_mul(DEFAULT_LINE_HEIGHT_PX), DEFAULT_LINE_HEIGHT_PX)
    }

    /// Scroll by whole lines; negative values scroll up
    pub fn scroll_lines(&self, delta: i64) {
        let mut state = self.lock();
        let offset = delta.saturating_mul(i64::from(state.line_height));
        let target = (i64::from(state.scroll_top) + offset).max(0);
        state.scroll_top = u32::try_from(target).unwrap_or(u32::MAX);
        state.clamp();
    }

    /// Zero-based index of the topmost visible line
    pub fn first_visible_line(&self) -> usize {
        let state = self.lock();
        (state.scroll_top / state.line_height) as usize
    }

    /// Lines currently inside the viewport
    pub fn visible_lines(&self) -> Vec<String> {
        let state = self.lock();
        let first = (state.scroll_top / state.line_height) as usize;
        let rows = state.client_height.div_ceil(state.line_height) as usize;
        state
            .snapshot
            .as_str()
            .lines()
            .skip(first)
            .take(rows)
            .map(str::to_string)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FeedSurface for MemoryFeedSurface {
    fn metrics(&self) -> ScrollMetrics {
        self.lock().metrics()
    }

    fn set_scroll_top(&self, scroll_top: u32) {
        let mut state = self.lock();
        state.scroll_top = scroll_top;
        state.clamp();
    }

    fn replace_content(&self, snapshot: FeedSnapshot) {
        let mut state = self.lock();
        state.snapshot = snapshot;
        state.clamp();
    }

    fn snapshot(&self) -> FeedSnapshot {
        self.lock().snapshot.clone()
    }
}
