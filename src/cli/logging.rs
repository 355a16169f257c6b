//! Tracing subscriber setup for the CLI.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Initializes the global tracing subscriber.
///
/// Diagnostics go to stderr so they never mix with command output. The
/// default level follows the `-v` count; `RUST_LOG` overrides it.
pub fn init(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // try_init: the CLI entry point may be invoked more than once in tests.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .try_init();
}
