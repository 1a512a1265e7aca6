//! Per-file move decisions.
//!
//! A [`Mover`] takes one classified file through
//! `Pending -> {Skipped | AwaitingConfirmation} -> BackedUp -> Moved`.
//! Files that stay put (conflict under skip-existing, or declined) get no backup. The backup
//! is always taken before the move; if it fails the file is left untouched.
//! Dry-run mode stops after recording the intended destination and backup.

use crate::backup::{BackupEntry, BackupManager};
use crate::error::OrganizeError;
use crate::file_category::Category;
use crate::file_organizer::{FileOrganizer, Operation};
use crate::walker::FileRecord;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Asks whether a file should be moved to `destination`.
///
/// Any `FnMut(&Path, &Path) -> bool` closure is a `Confirm`.
pub trait Confirm {
    fn confirm(&mut self, file: &Path, destination: &Path) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Path, &Path) -> bool,
{
    fn confirm(&mut self, file: &Path, destination: &Path) -> bool {
        self(file, destination)
    }
}

/// Line-based yes/no prompt, usually over stdin/stdout.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    /// Answers "y" or "Y" mean yes; anything else, including EOF or a read error, means no.
    fn confirm(&mut self, file: &Path, destination: &Path) -> bool {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.display().to_string());
        let folder = destination.parent().unwrap_or(destination);

        if write!(
            self.output,
            "Move file '{}' to '{}'? (Y/N): ",
            name,
            folder.display()
        )
        .and_then(|_| self.output.flush())
        .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => answer.trim().eq_ignore_ascii_case("y"),
        }
    }
}

/// How moves are carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    /// Move without asking.
    Automatic,
    /// Ask through a [`Confirm`] before every move.
    Interactive,
    /// Report what would happen, touch nothing.
    DryRun,
}

/// What the mover plans to do with one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub source: PathBuf,
    pub category: Category,
    pub destination: PathBuf,
    pub backup: Option<PathBuf>,
}

/// Why a file was left where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A same-named file already exists at the destination.
    Conflict,
    /// The operator answered no.
    Declined,
}

/// Terminal state of one file.
#[derive(Debug)]
pub enum MoveOutcome {
    Moved {
        intent: MoveIntent,
        operation: Operation,
    },
    /// Dry run: the move that would have happened.
    WouldMove { intent: MoveIntent },
    Skipped {
        intent: MoveIntent,
        reason: SkipReason,
    },
    /// The file already sits at its destination.
    AlreadyInPlace,
    Failed {
        intent: MoveIntent,
        error: OrganizeError,
    },
}

impl MoveOutcome {
    /// Category to count in the statistics, for moved or dry-run intended files only.
    pub fn counted_category(&self) -> Option<&Category> {
        match self {
            MoveOutcome::Moved { intent, .. } | MoveOutcome::WouldMove { intent } => {
                Some(&intent.category)
            }
            _ => None,
        }
    }
}

/// Carries single files through backup and move.
pub struct Mover<'a> {
    target: PathBuf,
    mode: MoveMode,
    skip_existing: bool,
    backups: BackupManager,
    confirm: Box<dyn Confirm + 'a>,
}

impl<'a> Mover<'a> {
    pub fn new(
        target: impl Into<PathBuf>,
        mode: MoveMode,
        skip_existing: bool,
        backups: BackupManager,
        confirm: Box<dyn Confirm + 'a>,
    ) -> Self {
        Self {
            target: target.into(),
            mode,
            skip_existing,
            backups,
            confirm,
        }
    }

    pub fn mode(&self) -> MoveMode {
        self.mode
    }

    /// Processes one file classified as `category`.
    pub fn process(&mut self, record: &FileRecord, category: Category) -> MoveOutcome {
        let destination =
            FileOrganizer::destination_for(&self.target, &record.file_name, category.dir_name());
        if destination == record.path {
            return MoveOutcome::AlreadyInPlace;
        }

        let mut intent = MoveIntent {
            source: record.path.clone(),
            category,
            destination,
            backup: None,
        };

        if self.skip_existing && intent.destination.exists() {
            let warning = OrganizeError::Conflict {
                destination: intent.destination.clone(),
            };
            tracing::warn!("{}", warning);
            return MoveOutcome::Skipped {
                intent,
                reason: SkipReason::Conflict,
            };
        }

        // AwaitingConfirmation
        if self.mode == MoveMode::Interactive
            && !self.confirm.confirm(&intent.source, &intent.destination)
        {
            tracing::info!("File '{}' was not moved.", record.file_name);
            return MoveOutcome::Skipped {
                intent,
                reason: SkipReason::Declined,
            };
        }

        // BackedUp
        let backup = match self.backups.backup(record) {
            Ok(entry) => entry,
            Err(error) => {
                tracing::error!("{}", error);
                return MoveOutcome::Failed { intent, error };
            }
        };
        intent.backup = Some(backup.backup_path.clone());

        if self.mode == MoveMode::DryRun {
            tracing::info!(
                "[dry run] Would move file '{}' to '{}'",
                record.file_name,
                self.category_dir(&intent).display()
            );
            return MoveOutcome::WouldMove { intent };
        }

        self.perform(intent, backup)
    }

    fn category_dir(&self, intent: &MoveIntent) -> PathBuf {
        self.target.join(intent.category.dir_name())
    }

    fn perform(&mut self, intent: MoveIntent, backup: BackupEntry) -> MoveOutcome {
        match FileOrganizer::move_to_category_with_record(
            &self.target,
            &intent.source,
            intent.category.dir_name(),
        ) {
            Ok(mut operation) => {
                operation.backup_path = Some(backup.backup_path);
                tracing::info!(
                    "Moved file '{}' to '{}'",
                    intent.source.display(),
                    self.category_dir(&intent).display()
                );
                MoveOutcome::Moved { intent, operation }
            }
            Err(error) => {
                tracing::error!("{}", error);
                self.backups.discard(&backup);
                MoveOutcome::Failed { intent, error }
            }
        }
    }
}
