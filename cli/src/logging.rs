//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes logs to `~/.config/rezwatch/rezwatch.log` (or platform equivalent)
//! with 10 MB size-based rotation. Set `DEBUG_LOGGING=1` to enable debug
//! output for rezwatch crates.
//!
//! The console layer writes to stderr so it does not interleave with REPL
//! output on stdout.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

fn filter_directive(debug_logging: bool) -> &'static str {
    if debug_logging {
        "warn,rezwatch_cli=debug,rezwatch_core=debug"
    } else {
        "warn,rezwatch_cli=info,rezwatch_core=info"
    }
}

/// Initialize logging with dual output (file + stderr).
///
/// Returns a `WorkerGuard` that must be held for the whole session so
/// buffered log lines are flushed on exit. Falls back to stderr-only
/// logging (and returns `None`) when the log file cannot be created.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let Some(log_dir) = dirs::config_dir().map(|config| config.join("rezwatch")) else {
        init_console_only(debug_logging);
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // No subscriber yet
        eprintln!(
            "Failed to create log directory {:?}: {}, logging to console only",
            log_dir, e
        );
        init_console_only(debug_logging);
        return None;
    }

    let log_path = log_dir.join("rezwatch.log");
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(10 * 1024 * 1024),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
            init_console_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(EnvFilter::new(filter_directive(debug_logging)))
        .init();

    tracing::info!(log_file = ?log_path, debug_logging, "Logging initialized");

    Some(guard)
}

fn init_console_only(debug_logging: bool) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(EnvFilter::new(filter_directive(debug_logging)))
        .init();

    tracing::info!(debug_logging, "Logging initialized (console only)");
}
