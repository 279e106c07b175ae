//! Client configuration.

use std::{path::PathBuf, time::Duration};

use clap::ValueEnum;

use crate::usecase::feed_sync::DEFAULT_POLL_INTERVAL;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_VIEWPORT_ROWS: u32 = 20;

const STORE_DIR: &str = "chatfeed";
const STORE_FILE: &str = "preferences.json";
const FALLBACK_STORE_FILE: &str = "chatfeed-preferences.json";

/// How feed updates are triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Transport {
    /// Push if the server offers an event stream, else poll
    #[default]
    Auto,
    /// Always subscribe to the event stream
    Push,
    /// Always poll on a fixed interval
    Poll,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub transport: Transport,
    pub poll_interval: Duration,
    /// Safety-net refresh interval in push mode (off when `None`)
    pub push_watchdog: Option<Duration>,
    pub store_path: PathBuf,
    pub viewport_rows: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            transport: Transport::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            push_watchdog: None,
            store_path: default_store_path(),
            viewport_rows: DEFAULT_VIEWPORT_ROWS,
        }
    }
}

/// `<config dir>/chatfeed/preferences.json`, or a file in the working
/// directory when the platform has no config directory
pub fn default_store_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(STORE_DIR).join(STORE_FILE))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_STORE_FILE))
}
