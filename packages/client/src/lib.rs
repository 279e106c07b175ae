//! Chat feed client runtime.
//!
//! Keeps a displayed message feed in sync with a chat server over a
//! server-sent-events channel (or fixed-interval polling when push is not
//! available), preserves the reader's scroll position across updates, and
//! submits new messages without leaving the feed.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
