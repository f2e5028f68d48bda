//! Diagnostic logging to stderr

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::config::Verbosity;

/// Default filter directive for a verbosity level.
///
/// `RUST_LOG` takes precedence when set.
#[must_use]
pub const fn default_filter(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "info,pinpoint=debug",
        Verbosity::Debug => "trace",
    }
}

/// Install the global subscriber. Calling twice is a no-op.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr)
        .with_target(true)
        .with_level(true)
        .compact()
        .try_init();
}
