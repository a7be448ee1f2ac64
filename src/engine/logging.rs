//! Logging setup for the bootstrap binary.
//!
//! Logs go to stderr so that stdout stays clean for `--format json`.
//! The filter comes from `RUST_LOG` when set.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(false);
        init_logging(true);
        tracing::info!("logging initialised");
    }
}
