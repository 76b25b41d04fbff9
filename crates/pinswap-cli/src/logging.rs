//! Logging setup. Library crates only emit `tracing` events; the binary owns
//! the subscriber.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the stderr subscriber.
///
/// `RUST_LOG` applies unless `-v` is given; without either, warnings are
/// shown so the patch/restore notices stay visible.
pub(crate) fn init(verbosity: u8, json: bool) {
    let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok(), verbosity);

    let subscriber = tracing_subscriber::registry().with(filter);
    if json {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

pub(crate) fn build_filter(rust_log: Option<String>, verbosity: u8) -> EnvFilter {
    let filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    if verbosity == 0 {
        return filter;
    }
    filter.add_directive(level_for(verbosity).into())
}

/// `verbosity`: 0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE.
pub(crate) fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
