//! Tracing subscriber setup shared by both binaries.

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `llamit=debug`.
pub const LOG_ENV_VAR: &str = "LLAMIT_LOG";

/// Build the filter: `LLAMIT_LOG` if set and valid, otherwise `default`.
pub fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install a stderr fmt subscriber. Stdout stays reserved for the message.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(default: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
