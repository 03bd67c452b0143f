use std::io;

use tracing_subscriber::EnvFilter;

/// Sends diagnostics to stderr, filtered by `RUST_LOG` (default `warn`), so that stdout
/// only carries decoded text.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
