//! Tracing setup for the `lift` binary and the core's unit tests.
//!
//! Commands print their results on stdout, so diagnostics go to stderr and
//! stay quiet unless something needs attention. Set `RUST_LOG=lift_core=debug`
//! to follow repository and use-case calls.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the subscriber used by the CLI: `warn` unless RUST_LOG says otherwise
pub fn init() {
    init_with_level("warn")
}

/// Install a compact stderr subscriber with `default_level` as the fallback filter
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route debug output through the test harness; safe to call from every test
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
