//! Logging setup
//!
//! The terminal belongs to the editor, so logs only go to a file:
//! `~/.config/kestrel/logs/kestrel.log` with daily rotation.
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs (the default)
//! - `RUST_LOG=message=debug,kestrel::lsp=trace` - scoped filtering

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the file logger. Must run before the terminal enters raw mode,
/// since a failure is reported on stderr.
pub fn init() {
    let logs_dir = match crate::config_paths::ensure_logs_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let file_appender = tracing_appender::rolling::daily(logs_dir, "kestrel.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).init();
}
