/// File moves into category directories and the operation history.
///
/// This module moves single files into category-specific subdirectories of a target
/// folder and records every move in a JSON history file so undo can put files back
/// exactly where they came from.
use crate::error::{OrganizeError, OrganizeResult};
use crate::walker::HISTORY_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents a single file organization operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// The original path of the file before organization.
    pub original_path: PathBuf,
    /// The new path of the file after organization.
    pub new_path: PathBuf,
    /// The category the file was moved to.
    pub category: String,
    /// Backup copy taken before the move.
    #[serde(default)]
    pub backup_path: Option<PathBuf>,
}

/// Every move recorded for a target folder, across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationLog {
    /// RFC 3339 timestamp of the last update.
    pub timestamp: String,
    /// The base directory where organization occurred.
    pub base_path: PathBuf,
    pub operations: Vec<Operation>,
}

impl OperationLog {
    /// Creates a new operation log for a given base path.
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            base_path,
            operations: Vec::new(),
        }
    }

    /// Loads the existing history for `base_path`, or starts an empty one.
    pub fn load_or_new(base_path: &Path) -> OrganizeResult<Self> {
        Ok(Self::load(base_path)?.unwrap_or_else(|| Self::new(base_path.to_path_buf())))
    }

    /// Adds an operation to this log.
    pub fn add_operation(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Removes and returns the most recent operation whose backup is `backup_path`.
    pub fn take_by_backup(&mut self, backup_path: &Path) -> Option<Operation> {
        let index = self
            .operations
            .iter()
            .rposition(|op| op.backup_path.as_deref() == Some(backup_path))?;
        Some(self.operations.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Backups recorded by operations that have not been undone yet.
    pub fn backup_paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.operations
            .iter()
            .filter_map(|op| op.backup_path.as_deref())
    }

    /// Returns the path to the history file for this base path.
    pub fn history_file_path(base_path: &Path) -> PathBuf {
        base_path.join(HISTORY_FILE_NAME)
    }

    /// Saves this log to disk in JSON format.
    pub fn save(&mut self, base_path: &Path) -> OrganizeResult<()> {
        self.timestamp = chrono::Utc::now().to_rfc3339();
        let json_string =
            serde_json::to_string_pretty(self).map_err(|e| OrganizeError::HistoryWriteFailed {
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("JSON serialization failed: {}", e),
                ),
            })?;

        fs::write(Self::history_file_path(base_path), json_string)
            .map_err(|e| OrganizeError::HistoryWriteFailed { source: e })
    }

    /// Loads the operation log from disk, if one exists.
    pub fn load(base_path: &Path) -> OrganizeResult<Option<Self>> {
        let history_path = Self::history_file_path(base_path);

        if !history_path.exists() {
            return Ok(None);
        }

        let json_string = fs::read_to_string(&history_path)
            .map_err(|e| OrganizeError::HistoryReadFailed { source: e })?;

        serde_json::from_str(&json_string)
            .map(Some)
            .map_err(|e| OrganizeError::InvalidHistoryFormat {
                reason: format!("JSON parse error: {}", e),
            })
    }

    /// Deletes the history file for a given base path.
    pub fn delete(base_path: &Path) -> OrganizeResult<()> {
        let history_path = Self::history_file_path(base_path);
        if history_path.exists() {
            fs::remove_file(&history_path)
                .map_err(|e| OrganizeError::HistoryWriteFailed { source: e })?;
        }
        Ok(())
    }
}

/// Moves files into category subdirectories of a base directory.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Returns `<base>/<category>/<file name>`.
    pub fn destination_for(base_path: &Path, file_name: &str, category_dir_name: &str) -> PathBuf {
        base_path.join(category_dir_name).join(file_name)
    }

    /// Moves a file into its category directory within the base path and records the operation.
    ///
    /// If the category directory doesn't exist, it is created automatically. An existing
    /// file at the destination is replaced; callers decide beforehand whether that is allowed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use foldertidy::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let result = FileOrganizer::move_to_category_with_record(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/image.png"),
    ///     "Images"
    /// );
    ///
    /// match result {
    ///     Ok(op) => println!("Moved {} to {}", op.original_path.display(), op.new_path.display()),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn move_to_category_with_record(
        base_path: &Path,
        file_path: &Path,
        category_dir_name: &str,
    ) -> OrganizeResult<Operation> {
        if !base_path.is_dir() {
            return Err(OrganizeError::TargetNotFound {
                path: base_path.to_path_buf(),
            });
        }

        let category_path = base_path.join(category_dir_name);

        if !category_path.exists() {
            fs::create_dir_all(&category_path).map_err(|e| {
                OrganizeError::DirectoryCreationFailed {
                    path: category_path.clone(),
                    source: e,
                }
            })?;
        }

        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::MoveFailed {
                path: file_path.to_path_buf(),
                destination: category_path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;

        let destination_path = category_path.join(file_name);

        fs::rename(file_path, &destination_path).map_err(|e| OrganizeError::MoveFailed {
            path: file_path.to_path_buf(),
            destination: destination_path.clone(),
            source: e,
        })?;

        Ok(Operation {
            original_path: file_path.to_path_buf(),
            new_path: destination_path,
            category: category_dir_name.to_string(),
            backup_path: None,
        })
    }
}
