//! Error types for the organize, backup and undo passes.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while organizing, backing up or restoring files.
///
/// Only [`OrganizeError::TargetNotFound`] and history failures are fatal for a run.
/// Everything else is scoped to a single file and gets logged before the run moves on.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The target folder does not exist or is not a directory.
    #[error("Target folder not found: {}", path.display())]
    TargetNotFound { path: PathBuf },

    /// Failed to create a category or backup directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a file to its backup location failed; the source was left untouched.
    #[error("Failed to back up {} to {}: {source}", path.display(), backup.display())]
    BackupFailed {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move a file to its destination.
    #[error("Failed to move {} to {}: {source}", path.display(), destination.display())]
    MoveFailed {
        path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination is already occupied and `skip_existing` is enabled.
    #[error("File '{}' already exists. Skipping.", destination.display())]
    Conflict { destination: PathBuf },

    /// Undo was requested without a backup folder to restore from.
    #[error("Backup folder not specified. Undo not possible.")]
    BackupUnavailable,

    /// Generic per-file IO failure (open, read, metadata).
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the history file.
    #[error("Failed to write history file: {source}")]
    HistoryWriteFailed {
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the history file.
    #[error("Failed to read history file: {source}")]
    HistoryReadFailed {
        #[source]
        source: std::io::Error,
    },

    /// History file has invalid format.
    #[error("Invalid history file format: {reason}")]
    InvalidHistoryFormat { reason: String },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;
