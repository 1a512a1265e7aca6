/// Undo functionality for reverting file organization operations.
///
/// Undo walks the backup folder and moves every `<path>.bak` back to the path the file
/// had before it was organized. Restoring consumes the backup, so a second undo finds
/// nothing left to do.
use crate::backup::{BackupLocation, original_name};
use crate::error::{OrganizeError, OrganizeResult};
use crate::file_organizer::{Operation, OperationLog};
use crate::hasher::hash_file;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Represents the result of an undo operation.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Number of files successfully restored (or that would be, in a dry run).
    pub restored_files: usize,
    /// Files that failed to restore, with the reason.
    pub failed_restores: Vec<(PathBuf, String)>,
    /// Backups that were left in place (e.g., destination occupied).
    pub skipped_files: Vec<(PathBuf, String)>,
}

impl UndoReport {
    /// Returns the total number of backups processed.
    pub fn total_processed(&self) -> usize {
        self.restored_files + self.failed_restores.len() + self.skipped_files.len()
    }

    /// Returns true if the undo was completely successful.
    pub fn is_complete_success(&self) -> bool {
        self.failed_restores.is_empty() && self.skipped_files.is_empty()
    }
}

/// Manages undo operations for file organization.
pub struct UndoManager;

impl UndoManager {
    /// Restores every backup found in the backup folder into `target`.
    ///
    /// The restore path is the original path recorded in the history file. Backups the
    /// history does not know go back to their location inside the backup folder, relative
    /// to `target` and without `.bak`. When the organized copy recorded in the history
    /// still has the backup's content it is removed, so the move is fully reversed.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::BackupUnavailable` when `location` has no backup folder and
    /// `OrganizeError::TargetNotFound` when the target is missing. Per-file problems are
    /// reported in the `UndoReport` and never stop the undo.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use foldertidy::backup::BackupLocation;
    /// use foldertidy::undo::UndoManager;
    /// use std::path::{Path, PathBuf};
    ///
    /// let location = BackupLocation::Folder(PathBuf::from("/path/to/directory/backup"));
    /// match UndoManager::undo(Path::new("/path/to/directory"), &location, false) {
    ///     Ok(report) => println!("Restored {} files", report.restored_files),
    ///     Err(e) => eprintln!("Undo failed: {}", e),
    /// }
    /// ```
    pub fn undo(
        target: &Path,
        location: &BackupLocation,
        dry_run: bool,
    ) -> OrganizeResult<UndoReport> {
        let Some(backup_dir) = location.folder() else {
            tracing::warn!("{}", OrganizeError::BackupUnavailable);
            return Err(OrganizeError::BackupUnavailable);
        };

        if !target.is_dir() {
            return Err(OrganizeError::TargetNotFound {
                path: target.to_path_buf(),
            });
        }

        let mut report = UndoReport::default();
        if !backup_dir.is_dir() {
            tracing::info!("No backups found in '{}'", backup_dir.display());
            return Ok(report);
        }

        let mut history = match OperationLog::load(target) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("{}; restoring by backup layout", e);
                None
            }
        };

        for (backup_path, relative) in Self::backups_in(backup_dir) {
            let operation = history
                .as_mut()
                .and_then(|log| log.take_by_backup(&backup_path));
            let destination = operation
                .as_ref()
                .map(|op| op.original_path.clone())
                .unwrap_or_else(|| target.join(&relative));

            if dry_run {
                tracing::info!(
                    "[dry run] Would restore backup file '{}' to '{}'",
                    backup_path.display(),
                    destination.display()
                );
                report.restored_files += 1;
                continue;
            }

            match Self::restore_file(&backup_path, &destination, operation.as_ref()) {
                Ok(()) => {
                    tracing::info!(
                        "Restored backup file '{}' to '{}'",
                        backup_path.display(),
                        destination.display()
                    );
                    report.restored_files += 1;
                }
                Err(RestoreError::Occupied) => {
                    tracing::warn!(
                        "Cannot restore '{}': '{}' already exists. Skipping.",
                        backup_path.display(),
                        destination.display()
                    );
                    report
                        .skipped_files
                        .push((backup_path, "Destination already exists".to_string()));
                    Self::keep_operation(history.as_mut(), operation);
                }
                Err(RestoreError::Io(reason)) => {
                    tracing::error!("Failed to restore '{}': {}", backup_path.display(), reason);
                    report.failed_restores.push((backup_path, reason));
                    Self::keep_operation(history.as_mut(), operation);
                }
            }
        }

        if !dry_run && let Some(history) = history.as_mut() {
            let result = if history.is_empty() {
                OperationLog::delete(target)
            } else {
                history.save(target)
            };
            if let Err(e) = result {
                tracing::warn!("Could not update history file: {}", e);
            }
        }

        Ok(report)
    }

    /// Backup files in `backup_dir`, sorted, with the relative path they restore to.
    fn backups_in(backup_dir: &Path) -> Vec<(PathBuf, PathBuf)> {
        WalkDir::new(backup_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable backup entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().to_string();
                let name = original_name(&file_name)?;
                let mut relative = entry
                    .path()
                    .strip_prefix(backup_dir)
                    .ok()?
                    .to_path_buf();
                relative.set_file_name(name);
                Some((entry.into_path(), relative))
            })
            .collect()
    }

    fn keep_operation(history: Option<&mut OperationLog>, operation: Option<Operation>) {
        if let (Some(history), Some(operation)) = (history, operation) {
            history.add_operation(operation);
        }
    }

    /// Moves one backup to `destination`, then drops the organized copy if it is identical.
    fn restore_file(
        backup_path: &Path,
        destination: &Path,
        operation: Option<&Operation>,
    ) -> Result<(), RestoreError> {
        if destination.exists() {
            return Err(RestoreError::Occupied);
        }

        if let Some(parent) = destination.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                RestoreError::Io(format!("Could not create {}: {}", parent.display(), e))
            })?;
        }

        fs::rename(backup_path, destination)
            .map_err(|e| RestoreError::Io(format!("Failed to restore file: {}", e)))?;

        if let Some(operation) = operation {
            Self::remove_organized_copy(&operation.new_path, destination);
        }
        Ok(())
    }

    fn remove_organized_copy(organized: &Path, restored: &Path) {
        if !organized.exists() {
            return;
        }
        match (hash_file(organized), hash_file(restored)) {
            (Ok(a), Ok(b)) if a == b => {
                if let Err(e) = fs::remove_file(organized) {
                    tracing::warn!("Could not remove '{}': {}", organized.display(), e);
                }
            }
            (Ok(_), Ok(_)) => tracing::warn!(
                "'{}' changed since it was organized; keeping it",
                organized.display()
            ),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Could not compare '{}': {}", organized.display(), e)
            }
        }
    }
}

enum RestoreError {
    Occupied,
    Io(String),
}
