//! Logging setup using `tracing-subscriber`.
//!
//! Console-only: one-shot batch jobs have no use for file rotation. All
//! diagnostics go to stderr as human-readable lines, controlled by
//! `RUST_LOG` (default: `info`).

use tracing_subscriber::EnvFilter;

/// Initialise console logging for the run.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
