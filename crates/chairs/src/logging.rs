//! Tracing setup for binaries.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber that writes to stderr.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. `"info"`
/// or `"chairs_game=debug"`) is used. Stdout stays free for game events.
/// Calling this twice is harmless: the second call is ignored.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
