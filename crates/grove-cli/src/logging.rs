//! Log output for the CLI.

use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter, e.g. `GROVE_LOG=grove_runtime=debug`.
pub const LOG_ENV: &str = "GROVE_LOG";

/// Install a stderr subscriber filtered by [`LOG_ENV`], `warn` by default.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // Fails only when a subscriber is already installed.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
