//! Tracing subscriber setup for the x2sync binary.
//!
//! Library code only emits `tracing` events; this module decides where they
//! go. Events are written to stderr without timestamps so they interleave
//! cleanly with regular output.

use crate::output::Verbosity;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable that overrides the computed filter.
pub const LOG_ENV: &str = "RUST_LOG";

/// Default filter directive for a verbosity level.
#[must_use]
pub const fn default_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "x2sync=debug",
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity-derived default. Calling
/// this more than once is harmless; later calls are ignored.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity == Verbosity::Verbose)
                .without_time(),
        )
        .try_init();
}
