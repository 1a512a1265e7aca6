//! Backup copies taken before a file is moved.
//!
//! Every file is copied to `<name>.bak` before the mover touches it. With a backup folder
//! the copy lands at the file's relative path under that folder; without one it lands next
//! to the original. An existing backup is never overwritten. Backups are never deleted by a
//! successful move; [`crate::undo`] consumes them.

use crate::error::{OrganizeError, OrganizeResult};
use crate::walker::{BACKUP_SUFFIX, FileRecord};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Where backup copies are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupLocation {
    /// A dedicated folder holding every backup.
    Folder(PathBuf),
    /// Next to the original file, in the same directory.
    Alongside,
}

impl BackupLocation {
    /// The dedicated backup folder, if one is configured.
    pub fn folder(&self) -> Option<&Path> {
        match self {
            BackupLocation::Folder(dir) => Some(dir),
            BackupLocation::Alongside => None,
        }
    }
}

/// A backup copy that can later be restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub original_path: PathBuf,
    pub backup_path: PathBuf,
}

/// Returns the backup file name for `file_name` (`a.pdf` -> `a.pdf.bak`).
pub fn backup_name(file_name: &str) -> String {
    format!("{}{}", file_name, BACKUP_SUFFIX)
}

/// Strips the backup suffix (`a.pdf.bak` -> `a.pdf`); `None` for non-backup names.
pub fn original_name(backup_file_name: &str) -> Option<&str> {
    backup_file_name
        .strip_suffix(BACKUP_SUFFIX)
        .filter(|name| !name.is_empty())
}

/// Takes backups according to a [`BackupLocation`].
#[derive(Debug, Clone)]
pub struct BackupManager {
    location: BackupLocation,
    dry_run: bool,
}

impl BackupManager {
    pub fn new(location: BackupLocation, dry_run: bool) -> Self {
        Self { location, dry_run }
    }

    /// Path the backup of `record` is written to.
    ///
    /// `sub/a.pdf` backs up to `<folder>/sub/a.pdf.bak`, or `sub/a.pdf.bak` alongside.
    pub fn backup_path_for(&self, record: &FileRecord) -> PathBuf {
        let name = backup_name(&record.file_name);
        match &self.location {
            BackupLocation::Folder(dir) => {
                let mut path = dir.join(&record.relative_path);
                path.set_file_name(name);
                path
            }
            BackupLocation::Alongside => record.parent.join(name),
        }
    }

    /// Copies `record` byte-for-byte to its backup path, preserving the modification time.
    ///
    /// In dry-run mode nothing is copied; the entry that would be created is returned.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::BackupFailed` if the folder cannot be created, a backup
    /// already occupies the path, or the copy fails. The caller must not move the file in
    /// that case.
    pub fn backup(&self, record: &FileRecord) -> OrganizeResult<BackupEntry> {
        let backup_path = self.backup_path_for(record);
        let entry = BackupEntry {
            original_path: record.path.clone(),
            backup_path,
        };

        let failed = |source: io::Error| OrganizeError::BackupFailed {
            path: record.path.clone(),
            backup: entry.backup_path.clone(),
            source,
        };

        if self.dry_run {
            if entry.backup_path.exists() {
                return Err(failed(io::Error::from(io::ErrorKind::AlreadyExists)));
            }
            tracing::info!(
                "[dry run] Would back up '{}' to '{}'",
                record.path.display(),
                entry.backup_path.display()
            );
            return Ok(entry);
        }

        if let Some(parent) = entry.backup_path.parent()
            && !parent.is_dir()
        {
            fs::create_dir_all(parent).map_err(failed)?;
        }

        copy_preserving_mtime(&record.path, &entry.backup_path).map_err(failed)?;

        tracing::debug!(
            "Backed up '{}' to '{}'",
            record.path.display(),
            entry.backup_path.display()
        );
        Ok(entry)
    }

    /// Removes a backup written for a move that did not happen.
    pub fn discard(&self, entry: &BackupEntry) {
        if self.dry_run {
            return;
        }
        if let Err(e) = fs::remove_file(&entry.backup_path) {
            tracing::warn!(
                "Could not remove unused backup '{}': {}",
                entry.backup_path.display(),
                e
            );
        }
    }
}

/// Copies `src` to a new file at `dst`, failing with `AlreadyExists` if `dst` is taken.
fn copy_preserving_mtime(src: &Path, dst: &Path) -> io::Result<()> {
    let mut source = File::open(src)?;
    let metadata = source.metadata()?;
    let mut target = OpenOptions::new().write(true).create_new(true).open(dst)?;
    io::copy(&mut source, &mut target)?;
    drop(target);

    fs::set_permissions(dst, metadata.permissions())?;
    let mtime = filetime::FileTime::from_last_modification_time(&metadata);
    // A lost timestamp does not invalidate the copy
    if let Err(e) = filetime::set_file_mtime(dst, mtime) {
        tracing::debug!("Could not preserve mtime on '{}': {}", dst.display(), e);
    }
    Ok(())
}
