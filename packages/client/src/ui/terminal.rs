//! Terminal implementations of the display ports.

use std::sync::Arc;

use tokio::sync::Notify;

use crate::domain::{
    FeedSnapshot, FeedSurface, ScrollMetrics, StatusIndicator, SubmissionStatus, Theme,
    ThemeIndicator,
};

use super::{formatter::ViewFormatter, prompt::redisplay_prompt, surface::MemoryFeedSurface};

/// Feed viewport printed to stdout.
///
/// Changes only mark the view dirty; [`TerminalFeedView::render_loop`]
/// redraws once the current refresh cycle has applied all of its effects,
/// so a content replacement followed by a re-pin prints a single frame.
pub struct TerminalFeedView {
    surface: MemoryFeedSurface,
    dirty: Notify,
}

impl TerminalFeedView {
    pub fn new(rows: u32) -> Self {
        Self {
            surface: MemoryFeedSurface::with_rows(rows.max(1)),
            dirty: Notify::new(),
        }
    }

    /// Scroll by whole lines; negative values scroll up
    pub fn scroll_lines(&self, delta: i64) {
        self.surface.scroll_lines(delta);
        self.dirty.notify_one();
    }

    /// Redraw whenever the view changed
    pub async fn render_loop(self: Arc<Self>) {
        loop {
            self.dirty.notified().await;
            self.render();
        }
    }

    pub fn render(&self) {
        let lines = self.surface.visible_lines();
        let first = self.surface.first_visible_line();
        let total = self.surface.snapshot().line_count();
        print!("{}", ViewFormatter::format_viewport(&lines, first, total));
        redisplay_prompt();
    }
}

impl FeedSurface for TerminalFeedView {
    fn metrics(&self) -> ScrollMetrics {
        self.surface.metrics()
    }

    fn set_scroll_top(&self, scroll_top: u32) {
        self.surface.set_scroll_top(scroll_top);
        self.dirty.notify_one();
    }

    fn replace_content(&self, snapshot: FeedSnapshot) {
        self.surface.replace_content(snapshot);
        self.dirty.notify_one();
    }

    fn snapshot(&self) -> FeedSnapshot {
        self.surface.snapshot()
    }
}

/// Status line printed to stdout
#[derive(Debug, Default)]
pub struct TerminalStatus;

impl StatusIndicator for TerminalStatus {
    fn set_status(&self, status: SubmissionStatus) {
        print!("{}", ViewFormatter::format_status(status));
        redisplay_prompt();
    }
}

/// Theme line printed to stdout
#[derive(Debug, Default)]
pub struct TerminalThemeIndicator;

impl ThemeIndicator for TerminalThemeIndicator {
    fn show_theme(&self, theme: Theme) {
        print!("{}", ViewFormatter::format_theme(theme));
    }
}
