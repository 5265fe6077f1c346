//! Logging infrastructure for LandTiler.
//!
//! Provides structured logging with file output and console output:
//! - Writes to `~/.landtiler/logs/landtiler.log` (cleared on session start)
//! - Also prints to stderr so stdout stays clean for command output
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging system.
///
/// Creates the log directory if needed, clears the previous log file and
/// sets up output to both the file and stderr.
///
/// # Arguments
///
/// * `log_dir` - Directory for log files
/// * `log_file` - Log filename (e.g., "landtiler.log")
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the log file
/// cannot be cleared.
pub fn init_logging(log_dir: &Path, log_file: &str) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;

    // Start each session with an empty file
    fs::write(log_dir.join(log_file), "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    // Defaults to INFO if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Get default log directory path (~/.landtiler/logs).
pub fn default_log_dir() -> PathBuf {
    crate::config::config_directory().join("logs")
}

/// Get default log file name.
pub fn default_log_file() -> &'static str {
    "landtiler.log"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        assert!(default_log_dir().ends_with(".landtiler/logs"));
        assert_eq!(default_log_file(), "landtiler.log");
    }

    #[test]
    fn test_init_clears_previous_log_and_rejects_second_subscriber() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("nested").join("logs");
        fs::create_dir_all(&log_dir).unwrap();
        fs::write(log_dir.join("test.log"), "old log data").unwrap();

        // Only one global subscriber per process, so both checks live here
        let guard = init_logging(&log_dir, "test.log").unwrap();
        assert!(log_dir.join("test.log").exists());
        assert_ne!(
            fs::read_to_string(log_dir.join("test.log")).unwrap(),
            "old log data"
        );

        let second = init_logging(&log_dir, "other.log");
        assert!(second.is_err());
        drop(guard);
    }

    #[test]
    fn test_unwritable_directory_is_an_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        // A regular file cannot be used as a directory
        assert!(init_logging(&blocker.join("logs"), "test.log").is_err());
    }
}
