//! Logging for the command-line tool.
//!
//! Diagnostics go to stderr so that `show` output on stdout stays clean.
//! Master keys and decrypted content are never logged.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber: `warn` by default, `debug` with
/// `--verbose`, `RUST_LOG` overrides both.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .compact()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
