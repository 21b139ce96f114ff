//! Diagnostics for the `bmi` binary.
//!
//! Calculation results go to stdout; tracing output goes to stderr so the
//! two never interleave in piped output or tests.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the subscriber used by `bmi`
///
/// Only warnings reach the terminal unless `RUST_LOG` asks for more,
/// e.g. `RUST_LOG=bmi_core=debug bmi calc 1.8 70` shows each computation.
pub fn init() {
    init_with_level("warn")
}

/// Install the subscriber with `default_level` as the fallback filter
///
/// A valid `RUST_LOG` directive replaces `default_level` entirely.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Debug-level output routed through the test harness; safe to call twice
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
