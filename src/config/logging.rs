//! Diagnostic logging setup.
//!
//! Records go to the configured log file (appended, no ANSI) at `info`, or
//! `debug` when verbose. Stderr receives warnings and errors, or everything
//! at `debug` when verbose. `RUST_LOG` overrides the file level.

use super::AppSettings;
use crate::error::{ConfigError, ConfigResult};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Open a log file for appending, creating it and its directory if needed.
pub fn open_log_file(path: &Path) -> ConfigResult<File> {
    let to_error = |e: io::Error| ConfigError::LogFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_error)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_error)
}

/// Level used for the log file and, when verbose, the console.
pub fn base_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Install the global subscriber.
///
/// Returns the error that forced a fallback to console-only logging, if any.
/// Calling this more than once keeps the first subscriber.
pub fn init_logging(settings: &AppSettings) -> Option<ConfigError> {
    let level = base_level(settings.verbose);

    let (log_file, fallback) = match settings.log_file.as_deref().map(open_log_file) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    let console_level = if settings.verbose { level } else { LevelFilter::WARN };

    let file_layer = log_file.map(|file| {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .with_filter(filter)
    });

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(console_level);

    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();

    fallback
}
