//! Logging setup for sitegenie
//!
//! Diagnostics go to stderr through tracing; chat output never does.
//! Filter: $SITEGENIE_LOG (EnvFilter syntax), default "warn", "debug" with -v.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SITEGENIE_LOG";

/// Pick the log filter. `--verbose` wins over the environment.
pub fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
