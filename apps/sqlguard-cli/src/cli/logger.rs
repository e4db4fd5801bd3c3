//! # Logger Module
//!
//! Logging for the CLI, built on `tracing-subscriber` layers:
//! - **EnvFilter Layer**: `RUST_LOG` support for module-level filtering
//! - **Format Layer**: the `fmt` compact layer for text, the `fmt` json layer
//!   for one JSON object per event
//!
//! ## Outputs
//!
//! By default events go to a daily rolling file `~/.sqlguard/cli.YYYY-MM-DD.log`.
//! Files older than 7 days are removed on startup. With `console = true`
//! events go to stderr instead, never to stdout, which carries command output.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Standard Rust log filtering, takes precedence over the level
//! - `SQLGUARD_LOGGER__LEVEL`: Log level (DEBUG, INFO, WARN, ERROR)
//! - `SQLGUARD_LOGGER__CONSOLE`: Log to stderr instead of the log file (default: `false`)
//! - `SQLGUARD_LOGGER__FORMAT`: Text or JSON (default: Text)

use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{warn, Subscriber};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

use super::settings::user_directory;

const LOG_FILE_PREFIX: &str = "cli";
const LOG_FILE_SUFFIX: &str = "log";

const LOG_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerLevel {
    #[serde(alias = "DEBUG", alias = "debug")]
    Debug,
    #[serde(alias = "INFO", alias = "info")]
    Info,
    #[serde(alias = "WARN", alias = "warn")]
    Warn,
    #[serde(alias = "ERROR", alias = "error")]
    Error,
}

impl LoggerLevel {
    pub fn to_tracing_level(&self) -> LevelFilter {
        match self {
            LoggerLevel::Debug => LevelFilter::DEBUG,
            LoggerLevel::Info => LevelFilter::INFO,
            LoggerLevel::Warn => LevelFilter::WARN,
            LoggerLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    #[serde(alias = "JSON", alias = "json")]
    Json,
    #[serde(alias = "TEXT", alias = "text")]
    Text,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LoggerSettings {
    #[serde(default = "default_log_level")]
    pub level: LoggerLevel,
    #[serde(default = "default_log_console")]
    pub console: bool,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_level() -> LoggerLevel {
    LoggerLevel::Info
}

fn default_log_console() -> bool {
    false
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl Default for LoggerSettings {
    fn default() -> Self {
        LoggerSettings {
            level: default_log_level(),
            console: default_log_console(),
            format: default_log_format(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoggerError {
    #[error("Failed to create the log file appender")]
    Appender(#[from] InitError),
    #[error("Failed to install the tracing subscriber")]
    Init(#[from] TryInitError),
}

// House-keeping: delete log files older than 7 days.
// Errors are swallowed so that logging setup never aborts the CLI.
fn clean_old_logs(directory: &Path) {
    let cut_off = SystemTime::now() - LOG_RETENTION;

    let Ok(dir) = directory.read_dir() else {
        warn!("Failed to read log directory {:?}", directory);
        return;
    };

    for entry in dir.flatten() {
        if entry.path().extension().is_some_and(|ext| ext == "log") {
            match entry.metadata().and_then(|md| md.modified()) {
                // Smaller time means older than the cut_off
                Ok(t) if t < cut_off => {
                    let _ = std::fs::remove_file(entry.path());
                }
                Ok(_) => {}
                Err(e) => warn!(
                    "Failed to read modification time for {:?}. {}",
                    entry.path(),
                    e
                ),
            }
        }
    }
}

/// Daily rolling appender writing `cli.YYYY-MM-DD.log` files into `directory`.
fn log_file_appender(directory: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(directory)
}

fn format_layer<S, W>(writer: W, format: LogFormat, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true);

    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Text => layer.compact().boxed(),
    }
}

pub fn setup_logging(settings: &LoggerSettings) -> Result<(), LoggerError> {
    let directory = user_directory();
    clean_old_logs(&directory);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.to_tracing_level().to_string()));

    if settings.console {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(format_layer(std::io::stderr, settings.format, true))
            .try_init()?;
    } else {
        let file_appender = log_file_appender(&directory)?;
        tracing_subscriber::registry()
            .with(env_filter)
            .with(format_layer(file_appender, settings.format, false))
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing::subscriber::with_default;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn capture(format: LogFormat) -> String {
        let captured = Captured::default();
        let subscriber =
            tracing_subscriber::registry().with(format_layer(captured.clone(), format, false));

        with_default(subscriber, || {
            tracing::info!(tables = 2, "Loaded table metadata");
        });

        captured.contents()
    }

    #[test]
    fn test_default_settings() {
        let settings = LoggerSettings::default();
        assert_eq!(settings.level, LoggerLevel::Info);
        assert_eq!(settings.format, LogFormat::Text);
        assert!(!settings.console);
    }

    #[test]
    fn test_levels_map_to_filters() {
        assert_eq!(LoggerLevel::Debug.to_tracing_level(), LevelFilter::DEBUG);
        assert_eq!(LoggerLevel::Error.to_tracing_level(), LevelFilter::ERROR);
    }

    #[test]
    fn test_settings_deserialize_with_aliases() {
        let settings: LoggerSettings =
            serde_json::from_str(r#"{"level": "debug", "format": "json", "console": true}"#)
                .unwrap();
        assert_eq!(settings.level, LoggerLevel::Debug);
        assert_eq!(settings.format, LogFormat::Json);
        assert!(settings.console);
    }

    #[test]
    fn test_text_format() {
        let output = capture(LogFormat::Text);
        assert!(output.contains("INFO"), "unexpected output {output}");
        assert!(output.contains("Loaded table metadata"));
        assert!(output.contains("tables=2"));
        assert!(!output.contains('\u{1b}'), "file output must not carry ANSI codes");
    }

    #[test]
    fn test_json_format() {
        let output = capture(LogFormat::Json);
        let event: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(event["level"], "INFO");
        assert_eq!(event["fields"]["message"], "Loaded table metadata");
        assert_eq!(event["fields"]["tables"], 2);
        assert!(event["timestamp"].is_string());
        assert!(event["target"].is_string());
    }

    #[test]
    fn test_appender_writes_daily_log_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let appender = log_file_appender(temp.path()).unwrap();
        let subscriber =
            tracing_subscriber::registry().with(format_layer(appender, LogFormat::Text, false));

        with_default(subscriber, || {
            tracing::warn!("Metadata file is empty");
        });

        let logs: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .flatten()
            .map(|entry| entry.path())
            .collect();
        assert_eq!(logs.len(), 1);

        let name = logs[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("cli."), "unexpected name {name}");
        assert_eq!(logs[0].extension().unwrap(), "log");
        assert!(std::fs::read_to_string(&logs[0])
            .unwrap()
            .contains("Metadata file is empty"));
    }

    #[test]
    fn test_clean_old_logs_removes_only_stale_log_files() {
        let temp = assert_fs::TempDir::new().unwrap();
        let stale = temp.child("cli.2000-01-01.log");
        stale.write_str("old").unwrap();
        let fresh = temp.child("cli.2099-01-01.log");
        fresh.write_str("new").unwrap();
        let config = temp.child("config.toml");
        config.write_str("").unwrap();

        let old = SystemTime::now() - LOG_RETENTION - Duration::from_secs(60);
        for path in [stale.path(), config.path()] {
            File::options()
                .write(true)
                .open(path)
                .unwrap()
                .set_modified(old)
                .unwrap();
        }

        clean_old_logs(temp.path());

        stale.assert(predicates::path::missing());
        fresh.assert(predicates::path::exists());
        config.assert(predicates::path::exists());
    }
}
