//! Directory traversal shared by every pass.
//!
//! A [`Walker`] yields [`FileRecord`]s depth-first with entries sorted by file name, so
//! two walks over the same tree see files in the same order. Each call to
//! [`Walker::files`] starts a fresh walk.

use crate::config::CompiledFilters;
use crate::file_category::extension_of;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Name of the run log written inside the target folder.
pub const LOG_FILE_NAME: &str = "filemover.log";

/// Name of the operation history written inside the target folder.
pub const HISTORY_FILE_NAME: &str = ".foldertidy_history.json";

/// Suffix appended to a file name to form its backup name.
pub const BACKUP_SUFFIX: &str = ".bak";

/// A file found during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub relative_path: PathBuf,
    pub file_name: String,
    /// Lower-cased extension, if the name has one.
    pub extension: Option<String>,
    /// Directory containing the file.
    pub parent: PathBuf,
}

impl FileRecord {
    fn from_entry(root: &Path, entry: &DirEntry) -> Self {
        let path = entry.path().to_path_buf();
        let file_name = entry.file_name().to_string_lossy().to_string();
        let relative_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());

        Self {
            extension: extension_of(&file_name),
            path,
            relative_path,
            file_name,
            parent,
        }
    }
}

/// Returns true for the log and history files the tool writes into the target.
///
/// Backups are not matched by name: a user's own `*.bak` file is organized like any other.
/// Backups the tool wrote are hidden through [`Walker::skip_path`].
pub fn is_reserved_file_name(name: &str) -> bool {
    name == LOG_FILE_NAME || name == HISTORY_FILE_NAME
}

/// Walks a target tree applying the configured filters.
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    filters: CompiledFilters,
    skip_paths: Vec<PathBuf>,
}

impl Walker {
    pub fn new(root: impl Into<PathBuf>, filters: CompiledFilters) -> Self {
        Self {
            root: root.into(),
            filters,
            skip_paths: Vec::new(),
        }
    }

    /// Never yields or descends into `path`.
    ///
    /// Used for a backup folder, recorded backups, or a mapping file inside the target tree.
    pub fn skip_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_skip_path(path);
        self
    }

    pub fn add_skip_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.skip_paths.contains(&path) {
            self.skip_paths.push(path);
        }
    }

    /// Returns a lazy iterator over every included file in the tree.
    ///
    /// Unreadable entries are logged and skipped.
    pub fn files(&self) -> impl Iterator<Item = FileRecord> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| self.keep_entry(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(move |entry| {
                let record = FileRecord::from_entry(&self.root, &entry);
                if is_reserved_file_name(&record.file_name)
                    || !self.filters.should_include(&record.relative_path)
                {
                    return None;
                }
                Some(record)
            })
    }

    fn keep_entry(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        if self.skip_paths.iter().any(|p| entry.path() == p.as_path()) {
            return false;
        }
        if !entry.file_type().is_dir() {
            return true;
        }
        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        self.filters.should_descend(relative)
    }
}
