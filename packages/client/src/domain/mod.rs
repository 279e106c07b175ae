//! Domain models and the ports the use cases depend on.

mod error;
mod ports;
mod scroll;
mod session;
mod status;
mod theme;

pub use error::{ClientError, StoreError, SyncError};
pub use ports::{
    ClientIdGenerator, ColorSchemeProbe, FeedSource, FeedSurface, KeyValueStore,
    StatusIndicator, ThemeIndicator,
};
#[cfg(test)]
pub use ports::MockFeedSource;
pub use scroll::{FeedSnapshot, PIN_THRESHOLD_PX, ScrollMetrics};
pub use session::{ClientId, ClientSession, ComposeDraft};
pub use status::SubmissionStatus;
pub use theme::{Theme, ThemeParseError};
