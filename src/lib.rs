//! foldertidy - sort a folder into category subfolders by file extension
//!
//! This library classifies files by extension, backs them up, moves them into
//! `<target>/<category>/` (with an `Unclassified` sweep for the rest), and can undo the
//! moves from the backups, report duplicate content and count files per category.
//! Filtering rules come from TOML settings files and the extension table from an
//! optional JSON mapping.

pub mod backup;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod hasher;
pub mod logging;
pub mod mover;
pub mod organizer;
pub mod output;
pub mod stats;
pub mod undo;
pub mod walker;

pub use backup::{BackupLocation, BackupManager};
pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use duplicates::{DuplicateDetector, DuplicatePair};
pub use error::{OrganizeError, OrganizeResult};
pub use file_category::{Category, Classifier, ExtensionMap};
pub use file_organizer::{FileOrganizer, OperationLog};
pub use mover::{Confirm, MoveMode, MoveOutcome, Mover};
pub use organizer::{Organizer, RunReport};
pub use stats::Stats;
pub use undo::{UndoManager, UndoReport};
pub use walker::{FileRecord, Walker};

pub use cli::{OrganizeCommand, RunOptions, run_cli};
