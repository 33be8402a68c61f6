//! Logging initialization

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

fn filter_or(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize tracing with the configured level
///
/// `RUST_LOG`, when set and parseable, takes precedence over `level`.
pub fn init_tracing_with_level(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_or(level))
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .init();
}

/// Initialize tracing at `info`
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Run `f` with a temporary `info` subscriber
///
/// Covers what is logged before the configured level is known, such as
/// config loading.
pub fn with_startup_logging<T>(f: impl FnOnce() -> T) -> T {
    with_startup_logging_to(std::io::stdout, f)
}

fn with_startup_logging_to<W, T>(make_writer: W, f: impl FnOnce() -> T) -> T
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_or("info"))
        .with_target(false)
        .with_writer(make_writer)
        .finish();

    tracing::subscriber::with_default(subscriber, f)
}
