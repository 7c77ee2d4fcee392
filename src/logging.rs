//! Log setup
//!
//! The terminal belongs to the dashboard, so logs go to a file in the data
//! directory. `RUST_LOG` overrides the default filter.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "weatherlens=info";

/// Log file name inside the log directory
pub const LOG_FILE: &str = "weatherlens.log";

/// Default log directory, `None` without a home directory
pub fn default_log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "weatherlens").map(|dirs| dirs.data_local_dir().join("logs"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a file subscriber writing to `dir/weatherlens.log`.
///
/// The returned guard flushes buffered lines when dropped and must be kept
/// alive for the life of the program. Returns `None` (logging disabled) if the
/// directory cannot be created or a subscriber is already installed.
pub fn init_file_logging(dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(dir).ok()?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}

/// Installs a subscriber writing to stderr, for the headless commands
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
