// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. Debug runs open up this crate's
/// per-strategy decisions (skipped cards, dropped groups, stop markers).
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "info,toc_extractor=debug"
    } else {
        "info"
    }
}

/// Installs the fmt subscriber. `RUST_LOG` wins over [`default_filter`].
///
/// Only the binary calls this; the library just emits events.
pub fn setup_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .init();

    let debug_enabled = debug;
    tracing::debug!("Logging setup complete (debug: {}).", debug_enabled);
}
