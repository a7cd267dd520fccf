#![forbid(unsafe_code)]

//! Logging setup helpers.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! application's (or the test's) job. These helpers cover the two common
//! cases.

/// Filter variable consulted by [`init_json_logging`].
pub const LOG_ENV: &str = "GLOSS_LOG";

/// Install a human-readable subscriber that writes through the test harness.
///
/// Safe to call from every test: only the first call installs anything.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Install a JSON subscriber filtered by `GLOSS_LOG` (default `info`).
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
