//! Operational diagnostics for the crate itself.
//!
//! # Responsibilities
//! - Install the `tracing` subscriber used for the crate's own events
//!   (sink failures, server lifecycle)
//!
//! # Design Decisions
//! - Diagnostics go to stderr so they never interleave with the JSON
//!   records the logger writes to stdout
//! - Filter is taken from `RUST_LOG` when set, otherwise `default_filter`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "structured_logger=info,tower_http=info";

/// Install the global diagnostics subscriber.
///
/// Returns `false` if a global subscriber was already set.
pub fn init_diagnostics(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
