//! Unified logging integration
//!
//! Library code only emits `tracing` events; binaries and tests call
//! [`init_logging`] once to install a formatting subscriber filtered by
//! `RUST_LOG` (default `info`).

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber. Safe to call repeatedly.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Same as [`init_logging`] with a caller-chosen filter when `RUST_LOG` is unset
pub fn init_logging_with_default(default_filter: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        // Another subscriber may already be installed by the host application
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .try_init()
            .is_ok();

        if installed {
            tracing::debug!("📝 Initialized tracing logging");
        }
    });
}
