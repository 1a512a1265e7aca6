//! Command-line interface module for foldertidy.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Loading the mapping and filter settings
//! - Organization and undo orchestration

use crate::backup::{BackupLocation, BackupManager};
use crate::config::{CompiledFilters, FilterConfig};
use crate::duplicates::{DuplicateDetector, DuplicatePair};
use crate::error::OrganizeError;
use crate::file_category::{Classifier, ExtensionMap};
use crate::file_organizer::OperationLog;
use crate::mover::{Confirm, MoveMode, Prompt};
use crate::organizer::{ProgressSink, RunReport, organizer_for};
use crate::output::OutputFormatter;
use crate::undo::{UndoManager, UndoReport};
use crate::walker::Walker;
use clap::Parser;
use std::path::{Path, PathBuf};

/// File name of the mapping looked up inside the target when `--mapping` is not given.
pub const DEFAULT_MAPPING_FILE: &str = "config.json";

/// Sort a folder into category subfolders by file extension.
#[derive(Parser, Debug)]
#[command(name = "foldertidy", version, about)]
pub struct Cli {
    /// Folder to organize
    #[arg(default_value = ".")]
    pub target: PathBuf,

    /// Where backups go (default: <target>/backup)
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Write each backup next to its original instead of into a backup folder
    #[arg(long, conflicts_with = "backup_dir")]
    pub in_place_backups: bool,

    /// Only handle files whose names end with one of these suffixes (comma separated)
    #[arg(long, value_name = "SUFFIXES", value_delimiter = ',')]
    pub filter: Vec<String>,

    /// Skip folders whose path contains one of these strings (comma separated)
    #[arg(long, value_name = "FOLDERS", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Overwrite files already present at the destination
    #[arg(long)]
    pub overwrite: bool,

    /// Show what would happen without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Ask before every move
    #[arg(short, long, conflicts_with = "dry_run")]
    pub interactive: bool,

    /// Restore files from the backup folder
    #[arg(long)]
    pub undo: bool,

    /// Report duplicates and per-category counts after organizing
    #[arg(long)]
    pub stats: bool,

    /// JSON file mapping extensions to categories
    #[arg(long, value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// TOML filter settings file
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

impl Cli {
    pub fn command(&self) -> OrganizeCommand {
        if self.undo {
            OrganizeCommand::Undo
        } else {
            OrganizeCommand::Organize
        }
    }

    /// Turns parsed flags into run options.
    pub fn into_options(self) -> RunOptions {
        let mode = if self.dry_run {
            MoveMode::DryRun
        } else if self.interactive {
            MoveMode::Interactive
        } else {
            MoveMode::Automatic
        };

        let backup_dir = if self.in_place_backups {
            None
        } else {
            Some(
                self.backup_dir
                    .unwrap_or_else(|| self.target.join("backup")),
            )
        };

        RunOptions {
            target: self.target,
            backup_dir,
            suffixes: self.filter,
            exclude_dirs: self.exclude,
            skip_existing: !self.overwrite,
            mode,
            stats: self.stats,
            mapping: self.mapping,
            settings: self.settings,
        }
    }
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Organize files in a directory.
    Organize,
    /// Restore files from their backups.
    Undo,
}

/// Everything a run needs besides the command.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub target: PathBuf,
    /// `None` writes backups next to the originals.
    pub backup_dir: Option<PathBuf>,
    pub suffixes: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub skip_existing: bool,
    pub mode: MoveMode,
    pub stats: bool,
    pub mapping: Option<PathBuf>,
    pub settings: Option<PathBuf>,
}

impl RunOptions {
    /// Automatic moves with skip-existing on and backups next to the originals.
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            backup_dir: None,
            suffixes: Vec::new(),
            exclude_dirs: Vec::new(),
            skip_existing: true,
            mode: MoveMode::Automatic,
            stats: false,
            mapping: None,
            settings: None,
        }
    }

    pub fn dry_run(&self) -> bool {
        self.mode == MoveMode::DryRun
    }
}

/// What a command produced.
#[derive(Debug)]
pub enum CommandReport {
    Organized {
        report: RunReport,
        /// Present when statistics were requested.
        duplicates: Option<Vec<DuplicatePair>>,
    },
    Undone(UndoReport),
}

/// Runs the CLI application with the given command and options.
///
/// Interactive runs prompt on stdin/stdout.
///
/// # Examples
///
/// ```no_run
/// use foldertidy::cli::{run_cli, OrganizeCommand, RunOptions};
///
/// let options = RunOptions::new("/path/to/directory");
/// match run_cli(OrganizeCommand::Organize, &options) {
///     Ok(_) => println!("Operation completed successfully"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(command: OrganizeCommand, options: &RunOptions) -> Result<CommandReport, String> {
    run_cli_with_confirm(command, options, Box::new(Prompt::stdio()))
}

/// Runs a command, asking `confirm` before each move in interactive mode.
///
/// # Errors
///
/// Returns a message for fatal problems: a missing target, or a mapping or settings file
/// that cannot be loaded. Nothing is moved in those cases.
pub fn run_cli_with_confirm<'a>(
    command: OrganizeCommand,
    options: &RunOptions,
    confirm: Box<dyn Confirm + 'a>,
) -> Result<CommandReport, String> {
    let target = absolute(&options.target)?;
    if !target.is_dir() {
        return Err(OrganizeError::TargetNotFound { path: target }.to_string());
    }
    let backup_location = match &options.backup_dir {
        Some(dir) => BackupLocation::Folder(absolute(dir)?),
        None => BackupLocation::Alongside,
    };

    match command {
        OrganizeCommand::Organize => organize(&target, backup_location, options, confirm),
        OrganizeCommand::Undo => undo(&target, &backup_location, options.dry_run()),
    }
}

fn absolute(path: &Path) -> Result<PathBuf, String> {
    std::path::absolute(path).map_err(|e| format!("Invalid path {}: {}", path.display(), e))
}

/// `--mapping` if given, else `<target>/config.json` when it exists.
fn mapping_path(target: &Path, options: &RunOptions) -> Result<Option<PathBuf>, String> {
    if let Some(path) = &options.mapping {
        return absolute(path).map(Some);
    }
    let in_target = target.join(DEFAULT_MAPPING_FILE);
    Ok(in_target.is_file().then_some(in_target))
}

fn organize<'a>(
    target: &Path,
    backup_location: BackupLocation,
    options: &RunOptions,
    confirm: Box<dyn Confirm + 'a>,
) -> Result<CommandReport, String> {
    let dry_run = options.dry_run();

    let settings = options.settings.as_deref().map(absolute).transpose()?;
    let mut config = FilterConfig::load(settings.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    config.extend(&options.suffixes, &options.exclude_dirs);
    let filters = config
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    let mapping = mapping_path(target, options)?;
    let extension_map = match &mapping {
        Some(path) => ExtensionMap::load_overrides(path)
            .map_err(|e| format!("Error loading mapping: {}", e))?,
        None => ExtensionMap::default(),
    };

    let skipped: Vec<PathBuf> = backup_location
        .folder()
        .map(Path::to_path_buf)
        .into_iter()
        .chain(mapping)
        .chain(settings)
        .collect();
    let walker_for = |filters: CompiledFilters| {
        skipped
            .iter()
            .fold(Walker::new(target, filters), |walker, path| walker.skip_path(path))
    };

    if dry_run {
        OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", target.display()));
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", target.display()));
    }

    let mut organizer = organizer_for(
        target,
        Classifier::new(extension_map),
        walker_for(filters.clone()),
        BackupManager::new(backup_location, dry_run),
        options.mode,
        options.skip_existing,
        confirm,
    );

    // The prompt and the bar would fight over the terminal
    let mut progress: Box<dyn ProgressSink> = if options.mode == MoveMode::Interactive {
        Box::new(())
    } else {
        Box::new(OutputFormatter::create_progress_bar(0))
    };
    let report = organizer
        .run(progress.as_mut())
        .map_err(|e| format!("Error: {}", e))?;

    OutputFormatter::print_run_summary(&report, dry_run);

    let duplicates = options.stats.then(|| {
        let mut walker = walker_for(filters.directories_only());
        if let Ok(Some(history)) = OperationLog::load(target) {
            for backup in history.backup_paths() {
                walker.add_skip_path(backup);
            }
        }
        let pairs = DuplicateDetector::new(walker).scan();
        OutputFormatter::print_duplicates(&pairs);
        OutputFormatter::print_stats(&report.stats);
        pairs
    });

    if dry_run {
        OutputFormatter::dry_run_notice("Dry run complete. No files were modified.");
    } else if report.moved() > 0 {
        OutputFormatter::plain(&format!(
            "Use 'foldertidy {} --undo' to revert changes.",
            target.display()
        ));
    }

    Ok(CommandReport::Organized { report, duplicates })
}

fn undo(
    target: &Path,
    backup_location: &BackupLocation,
    dry_run: bool,
) -> Result<CommandReport, String> {
    if dry_run {
        OutputFormatter::dry_run_notice("Listing restores without touching any file.");
    } else {
        OutputFormatter::info("Undoing previous organization...");
    }

    match UndoManager::undo(target, backup_location, dry_run) {
        Ok(report) => {
            OutputFormatter::print_undo_report(&report, dry_run);
            Ok(CommandReport::Undone(report))
        }
        Err(OrganizeError::BackupUnavailable) => {
            OutputFormatter::warning(&OrganizeError::BackupUnavailable.to_string());
            Ok(CommandReport::Undone(UndoReport::default()))
        }
        Err(e) => Err(format!("Error: {}", e)),
    }
}
