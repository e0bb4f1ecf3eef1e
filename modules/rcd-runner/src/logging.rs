//! Log sink: console plus an append-only file, both with `MM/dd/yy HH:mm:ss`
//! timestamps in local time.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::EnvironmentError;

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "RestrictedContentDiscovery.log";

const TIMESTAMP_FORMAT: &str = "%m/%d/%y %H:%M:%S";
const DEFAULT_FILTER: &str = "rcd=info,rcd_runner=info,spo_admin_client=info";

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogTimestamp;

impl FormatTime for LogTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", format_timestamp(&Local::now().naive_local()))
    }
}

/// Open `dir/file_name` for appending, creating the directory if needed.
pub fn open_log_file(dir: &Path, file_name: &str) -> Result<(File, PathBuf), EnvironmentError> {
    std::fs::create_dir_all(dir).map_err(|source| EnvironmentError::LogSink {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(file_name);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| EnvironmentError::LogSink {
            path: path.clone(),
            source,
        })?;

    Ok((file, path))
}

/// Install the global subscriber. Returns the log file path.
pub fn init(dir: &Path, file_name: &str) -> Result<PathBuf, EnvironmentError> {
    let (file, path) = open_log_file(dir, file_name)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_timer(LogTimestamp).with_target(false))
        .with(
            fmt::layer()
                .with_timer(LogTimestamp)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .init();

    Ok(path)
}
