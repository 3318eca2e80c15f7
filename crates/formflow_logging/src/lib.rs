//! Shared logging utilities for Formflow binaries.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "formflow=info,formflow_db=info";

/// Initialize tracing with a daily-rolling file writer and stderr output.
///
/// Returns the appender guard; hold it for the lifetime of the process so
/// buffered log lines are flushed on shutdown.
pub fn init_logging(app_name: &str, verbose: bool) -> Result<WorkerGuard> {
    let log_dir = ensure_logs_dir().context("Failed to ensure log directory")?;

    let file_appender = tracing_appender::rolling::daily(log_dir, format!("{app_name}.log"));
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let console_filter = if verbose {
        file_filter.clone()
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .init();

    Ok(guard)
}

/// Get the Formflow home directory: ~/.formflow
pub fn formflow_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("FORMFLOW_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .expect("Could not determine home directory")
        .join(".formflow")
}

/// Get the logs directory: ~/.formflow/logs
pub fn logs_dir() -> PathBuf {
    formflow_home().join("logs")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}
