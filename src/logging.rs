//! Run log written into the target folder.

use crate::walker::LOG_FILE_NAME;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub fn log_file_path(target: &Path) -> PathBuf {
    target.join(LOG_FILE_NAME)
}

/// Builds a subscriber appending one line per event to `<target>/filemover.log`.
///
/// The level filter comes from `RUST_LOG` and defaults to `info`.
pub fn file_subscriber(
    target: &Path,
) -> io::Result<impl tracing::Subscriber + Send + Sync + 'static> {
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(target))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .finish())
}

/// Installs the file subscriber as the global default.
pub fn init_file_logging(target: &Path) -> Result<(), String> {
    let subscriber = file_subscriber(target).map_err(|e| {
        format!(
            "Could not open log file {}: {}",
            log_file_path(target).display(),
            e
        )
    })?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Could not install logger: {}", e))
}
