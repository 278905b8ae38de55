//! Subscriber setup shared by the binaries. Libraries only emit events.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_ENV: &str = "ODDSBOARD_LOG";

fn filter(default: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default.as_str()))
}

/// Human-readable logs on stderr, filtered by `RUST_LOG`.
pub fn init_stderr(default: Level) {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter(default))
        .with_writer(io::stderr)
        .with_target(false)
        .finish();
    // A subscriber may already be installed (tests, embedding).
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Logs to `path` through a non-blocking writer. Keep the guard alive for
/// as long as events should be flushed.
pub fn init_file(path: &Path, default: Level) -> io::Result<WorkerGuard> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter(default))
        .with_ansi(false)
        .with_writer(writer)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(guard)
}

/// File named by `ODDSBOARD_LOG`, if any.
pub fn log_file_from_env() -> Option<PathBuf> {
    std::env::var_os(LOG_FILE_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
