use std::ffi::OsStr;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn env_filter(debug: bool) -> EnvFilter {
    let level = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("worklog_admin={level}")))
}

/// File logging for the terminal UI, which owns stdout and stderr.
///
/// Keep the guard alive until exit or buffered lines are lost.
pub fn init_file_logging(log_file: &Path, debug: bool) -> WorkerGuard {
    let dir = log_file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = log_file
        .file_name()
        .unwrap_or_else(|| OsStr::new("worklog-admin.log"));

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(debug))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Headless runs print results to stdout, so logs go to stderr.
pub fn init_stderr_logging(debug: bool) {
    tracing_subscriber::registry()
        .with(env_filter(debug))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
