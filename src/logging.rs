//! Structured logging setup using `tracing-subscriber`.
//!
//! Diagnostics go to stderr so stdout carries only the report.

use tracing_subscriber::EnvFilter;

/// Initialise console logging for the CLI.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is used. Safe to
/// call more than once: later calls are ignored.
pub fn init_cli(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
