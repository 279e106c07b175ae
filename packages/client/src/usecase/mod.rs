//! Use cases: preference and identity persistence, scroll anchoring, feed
//! synchronization and message submission.

pub mod compose;
pub mod feed_sync;
pub mod identity;
pub mod preference;
pub mod scroll_anchor;
pub mod submission;

pub use compose::{ComposeBox, ComposeKey, KeyAction};
pub use feed_sync::{FeedSyncEngine, PollHandle, SyncStrategy, select_strategy};
pub use identity::{CLIENT_ID_KEY, ClientIdentity};
pub use preference::{NICKNAME_KEY, PreferenceStore, THEME_KEY};
pub use scroll_anchor::ScrollAnchor;
pub use submission::SubmissionFlow;
