//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Installs the global subscriber. `RUST_LOG` wins over `level` when set and
/// valid. Calling this twice is harmless: the second call is ignored.
pub fn init_tracing(level: &str) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}
