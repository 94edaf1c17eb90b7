//! Logging bootstrap demonstration
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run --example logging_demo
//!
//! # JSON format
//! cargo run --example logging_demo -- json
//!
//! # Compact format with a custom filter
//! cargo run --example logging_demo -- compact "core_runtime=trace"
//! ```

use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::env;
use tracing::{debug, info, instrument, span, warn, Level};

fn main() {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };

    let mut config = LoggingConfig::default().with_format(format);
    if let Some(filter) = args.get(2) {
        config = config.with_default_filter(filter.clone());
    }
    init_logging(config).expect("Failed to initialize logging");

    info!(format = ?format, "Logging initialized");

    let load_span = span!(Level::INFO, "feed_load", feed = "recent_characters");
    let _enter = load_span.enter();

    info!("Starting refresh");
    debug!(offset = 0, limit = 50, "Fetching remote page");
    warn!(retry_in_ms = 500, "Remote briefly unavailable");
    merge_page(50);
    info!(end_of_pagination = false, "Refresh complete");
}

#[instrument]
fn merge_page(fetched: usize) {
    debug!(fetched, "Merging page into cache");
}
