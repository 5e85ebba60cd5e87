//! Structured logging
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

use crate::config::{self, DEFAULT_LOG_LEVEL};

fn filter_from_level(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Initialise tracing with the given filter directive.
///
/// Filter precedence (highest to lowest):
///
/// 1. CLI `--log-level`
/// 2. `NODE_LABELS_LOG`
/// 3. `warn`
///
/// An unparsable directive falls back to `warn`. If a global subscriber is
/// already set the call is a no-op.
pub fn init_logging(cli_level: Option<String>) {
    let level = config::log_level(cli_level);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_from_level(&level.value))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    // First subscriber wins.
    let _ = tracing::subscriber::set_global_default(subscriber);
    tracing::debug!(level = %level.value, origin = ?level.origin, "logging initialised");
}
