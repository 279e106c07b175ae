//! Feed snapshot and scroll geometry.

/// Distance from the bottom edge, in pixels, under which the view counts as pinned
pub const PIN_THRESHOLD_PX: i64 = 40;

/// The complete rendered feed as returned by one fetch.
///
/// Opaque: it replaces the previous snapshot wholesale and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedSnapshot(String);

impl FeedSnapshot {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of display lines the snapshot occupies
    pub fn line_count(&self) -> usize {
        self.0.lines().count()
    }
}

impl From<String> for FeedSnapshot {
    fn from(body: String) -> Self {
        Self(body)
    }
}

impl From<&str> for FeedSnapshot {
    fn from(body: &str) -> Self {
        Self(body.to_string())
    }
}

/// Geometry of the scrollable feed container, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub scroll_height: u32,
    pub scroll_top: u32,
    pub client_height: u32,
}

impl ScrollMetrics {
    /// True iff the viewport is within [`PIN_THRESHOLD_PX`] of the bottom edge
    pub fn is_near_bottom(&self) -> bool {
        let remaining = i64::from(self.scroll_height)
            - i64::from(self.scroll_top)
            - i64::from(self.client_height);
        remaining < PIN_THRESHOLD_PX
    }

    /// Largest valid `scroll_top`
    pub fn max_scroll_top(&self) -> u32 {
        self.scroll_height.saturating_sub(self.client_height)
    }
}
