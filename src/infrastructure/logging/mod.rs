//! Logging initialization.
//!
//! Sets up the global tracing subscriber from `LoggingConfig`: env-filter
//! level, json or pretty formatting, and an optional non-blocking file
//! writer. The returned guard must be kept alive for the process lifetime
//! when file logging is enabled.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::domain::models::LoggingConfig;

/// Initialize the global tracing subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("levelset={}", config.level)));

    match &config.file {
        Some(file) => {
            let path = Path::new(file);
            let directory = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .context("log file path has no file name")?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let builder = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false);
            if config.format == "json" {
                builder.json().init();
            } else {
                builder.init();
            }
            Ok(Some(guard))
        }
        None => {
            let builder = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr);
            if config.format == "json" {
                builder.json().init();
            } else {
                builder.init();
            }
            Ok(None)
        }
    }
}
