//! Logging setup.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. With a log directory set,
/// output goes to a daily-rolling file instead of stdout; keep the returned
/// guard alive until shutdown so buffered lines get flushed.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = config.directory.as_deref()
        && prepare_directory(dir)
    {
        let appender = tracing_appender::rolling::daily(dir, "employee-directory.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        subscriber.with_writer(writer).with_ansi(false).init();
        return Some(guard);
    }

    subscriber.init();
    None
}

/// Create the log directory. Reports to stderr and returns false when it
/// cannot be used, since no subscriber exists yet.
fn prepare_directory(dir: &Path) -> bool {
    match std::fs::create_dir_all(dir) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Log directory unusable ({}): {e}; logging to stdout", dir.display());
            false
        }
    }
}
