//! Terminal chat feed client.
//!
//! Shows the server's message feed in a scrollable viewport and keeps it in
//! sync: over server-sent events from `/events` when the server offers them,
//! otherwise by polling `/messages` every few seconds. Lines typed at the
//! prompt are posted to `/post`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chatfeed-client
//! cargo run --bin chatfeed-client -- --base-url http://127.0.0.1:3000 --transport poll
//! ```

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use chatfeed_client::config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_VIEWPORT_ROWS, Transport, default_store_path,
};
use chatfeed_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "chatfeed-client")]
#[command(about = "Terminal chat client with live feed sync over SSE or polling", long_about = None)]
struct Args {
    /// Chat server base URL
    #[arg(short = 'u', long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Update strategy
    #[arg(short = 't', long, value_enum, default_value_t = Transport::Auto)]
    transport: Transport,

    /// Seconds between polls in poll mode
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval_secs: u64,

    /// Refresh in push mode when no event arrived for this many seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    push_watchdog_secs: Option<u64>,

    /// Where theme, client ID and nickname are stored
    #[arg(short = 's', long)]
    store_path: Option<PathBuf>,

    /// Number of feed lines shown at once
    #[arg(short = 'r', long, default_value_t = DEFAULT_VIEWPORT_ROWS)]
    viewport_rows: u32,

    /// Default log level when RUST_LOG is not set
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

impl From<Args> for ClientConfig {
    fn from(args: Args) -> Self {
        Self {
            base_url: args.base_url,
            transport: args.transport,
            poll_interval: Duration::from_secs(args.poll_interval_secs),
            push_watchdog: args.push_watchdog_secs.map(Duration::from_secs),
            store_path: args.store_path.unwrap_or_else(default_store_path),
            viewport_rows: args.viewport_rows,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the client
    if let Err(e) = chatfeed_client::ui::run_client(args.into()).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
