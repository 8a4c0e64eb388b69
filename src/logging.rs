//! Logging initialization for sopmaker.
//!
//! TUI mode: logs to `<state>/logs/sopmaker-{datetime}.log`
//! CLI mode: logs to stderr

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Keeps the file writer alive; dropping it flushes buffered log lines.
pub struct LoggingHandle {
    pub _guard: Option<WorkerGuard>,

    /// Only set in TUI mode with file logging enabled
    pub log_file_path: Option<PathBuf>,
}

impl LoggingHandle {
    /// Log file that actually received output, for printing on exit
    pub fn written_log_file(&self) -> Option<&Path> {
        let path = self.log_file_path.as_deref()?;
        let len = path.metadata().map(|m| m.len()).unwrap_or(0);
        (len > 0).then_some(path)
    }
}

fn log_file_name(now: chrono::DateTime<chrono::Utc>) -> String {
    format!("sopmaker-{}.log", now.format("%Y%m%dT%H%M%SZ"))
}

fn effective_level(config: &Config, debug_override: bool) -> String {
    if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

/// Initialize logging based on mode and configuration.
///
/// `debug_override` comes from `--debug` and wins over the configured level;
/// `RUST_LOG` wins over both.
pub fn init_logging(
    config: &Config,
    is_tui_mode: bool,
    debug_override: bool,
) -> Result<LoggingHandle> {
    let level = effective_level(config, debug_override);
    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or(level));

    if is_tui_mode && config.logging.to_file {
        // Anything written to stderr would corrupt the alternate screen
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)
            .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;

        let log_filename = log_file_name(chrono::Utc::now());
        let log_file_path = logs_dir.join(&log_filename);

        let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();
        config
    }

    #[test]
    fn test_logs_path_under_state_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let logs_dir = config.logs_path();
        assert!(logs_dir.ends_with("logs"));
        assert!(logs_dir.starts_with(temp_dir.path()));
    }

    #[test]
    fn test_log_file_name_format() {
        let now = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(log_file_name(now), "sopmaker-20240309T140507Z.log");
    }

    #[test]
    fn test_debug_flag_overrides_level() {
        let mut config = Config::default();
        config.logging.level = "warn".to_string();
        assert_eq!(effective_level(&config, false), "warn");
        assert_eq!(effective_level(&config, true), "debug");
    }

    #[test]
    fn test_written_log_file_ignores_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sopmaker-x.log");
        std::fs::write(&path, "").unwrap();

        let handle = LoggingHandle {
            _guard: None,
            log_file_path: Some(path.clone()),
        };
        assert!(handle.written_log_file().is_none());

        std::fs::write(&path, "INFO Saved SOP\n").unwrap();
        assert_eq!(handle.written_log_file(), Some(path.as_path()));
    }

    #[test]
    fn test_no_log_file_without_path() {
        let handle = LoggingHandle {
            _guard: None,
            log_file_path: None,
        };
        assert!(handle.written_log_file().is_none());
    }
}
