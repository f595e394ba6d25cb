//! Logging initialization for the client.

use tracing_subscriber::EnvFilter;

/// Initialize the logging system.
///
/// Sets up tracing with:
/// - Human-readable output to stderr
/// - Log level from the RUST_LOG env var or the provided default
///
/// Safe to call more than once; subsequent calls are no-ops.
///
/// # Example
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("Client started");
/// ```
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(crate::DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
