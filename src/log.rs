// src/log.rs
// Thin macro layer over `tracing`. Call sites stay short (`logf!`, `logd!`, …)
// and the subscriber decides where lines go.
use std::sync::Once;

use tracing_subscriber::EnvFilter;

#[doc(hidden)]
pub use tracing as __tracing;

static INIT: Once = Once::new();

/// Install the stderr subscriber. `RUST_LOG` wins over `verbose` when set.
/// Safe to call more than once; only the first call has an effect.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose { "strava_scrape=debug,info" } else { "info" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(fallback));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        $crate::log::__tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        $crate::log::__tracing::debug!($($arg)*)
    };
}

/// Warn-level logging (skipped items, recoverable oddities)
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        $crate::log::__tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        $crate::log::__tracing::error!($($arg)*)
    };
}
