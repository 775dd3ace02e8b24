//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `LINKBOARD_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "linkboard=warn";

/// Installs a stderr `fmt` subscriber.
///
/// The filter comes from `LINKBOARD_LOG`, then `RUST_LOG`, then
/// [`DEFAULT_FILTER`]. Calling this twice is harmless.
pub fn init() {
    let filter = EnvFilter::try_from_env("LINKBOARD_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
