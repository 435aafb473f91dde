//! Tracing subscriber setup for the binary.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a stderr `fmt` subscriber filtered at `log_level`, unless
/// `RUST_LOG` is set. Later calls are no-ops.
pub fn init_logger(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
