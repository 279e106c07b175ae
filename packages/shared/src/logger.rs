//! Logging setup utilities for the chatfeed client.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the library crate and the binary. The log level can be
/// overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The library crate whose logs should be shown (e.g., "chatfeed-client")
/// * `binary_name` - The name of the binary (e.g., "chatfeed-client")
/// * `default_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use chatfeed_shared::logger::setup_logger;
///
/// setup_logger("chatfeed-client", "chatfeed-client", "info");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_filter(crate_name, binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Cargo package names use `-` while tracing targets use `_`. A binary that
/// shares its package's name yields a single directive.
pub fn default_filter(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    let crate_target = crate_name.replace('-', "_");
    let binary_target = binary_name.replace('-', "_");
    if crate_target == binary_target {
        format!("{}={}", crate_target, default_log_level)
    } else {
        format!(
            "{}={},{}={}",
            crate_target, default_log_level, binary_target, default_log_level
        )
    }
}
