//! The organize run: classification pass, unclassified sweep and history bookkeeping.

use crate::backup::BackupManager;
use crate::error::{OrganizeError, OrganizeResult};
use crate::file_category::{Category, Classifier};
use crate::file_organizer::OperationLog;
use crate::mover::{MoveMode, MoveOutcome, Mover, SkipReason};
use crate::stats::Stats;
use crate::walker::{FileRecord, Walker};
use std::path::{Path, PathBuf};

/// Which pass of a run is being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Files with a mapped category.
    Classify,
    /// Everything left over, sent to `Unclassified`.
    Sweep,
}

impl Pass {
    pub fn label(&self) -> &'static str {
        match self {
            Pass::Classify => "Processing files",
            Pass::Sweep => "Sweeping unclassified files",
        }
    }
}

/// Receives progress while a run is going.
pub trait ProgressSink {
    fn start(&mut self, _pass: Pass, _total: u64) {}
    fn advance(&mut self, _record: &FileRecord, _outcome: &MoveOutcome) {}
    fn finish(&mut self) {}
}

impl ProgressSink for () {}

/// Summary of one organize run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub stats: Stats,
    pub skipped: Vec<(PathBuf, SkipReason)>,
    pub failed: Vec<(PathBuf, String)>,
    pub already_in_place: usize,
    /// False if the history file could not be written.
    pub history_saved: bool,
}

impl RunReport {
    /// Files moved, or planned in a dry run.
    pub fn moved(&self) -> usize {
        self.stats.total()
    }

    fn absorb(&mut self, record: &FileRecord, outcome: &MoveOutcome, history: &mut OperationLog) {
        if let Some(category) = outcome.counted_category() {
            self.stats.record(category);
        }
        match outcome {
            MoveOutcome::Moved { operation, .. } => history.add_operation(operation.clone()),
            MoveOutcome::Skipped { reason, .. } => {
                self.skipped.push((record.path.clone(), *reason))
            }
            MoveOutcome::Failed { error, .. } => {
                self.failed.push((record.path.clone(), error.to_string()))
            }
            MoveOutcome::AlreadyInPlace => self.already_in_place += 1,
            MoveOutcome::WouldMove { .. } => {}
        }
    }
}

/// Runs the classify pass and the unclassified sweep over one target folder.
pub struct Organizer<'a> {
    target: PathBuf,
    classifier: Classifier,
    walker: Walker,
    mover: Mover<'a>,
}

impl<'a> Organizer<'a> {
    pub fn new(
        target: impl Into<PathBuf>,
        classifier: Classifier,
        walker: Walker,
        mover: Mover<'a>,
    ) -> Self {
        Self {
            target: target.into(),
            classifier,
            walker,
            mover,
        }
    }

    /// Organizes the target folder.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::TargetNotFound` if the target is missing. Per-file errors are
    /// collected in the report instead.
    pub fn run(&mut self, progress: &mut dyn ProgressSink) -> OrganizeResult<RunReport> {
        if !self.target.is_dir() {
            return Err(OrganizeError::TargetNotFound {
                path: self.target.clone(),
            });
        }

        let dry_run = self.mover.mode() == MoveMode::DryRun;
        let mut history = match OperationLog::load_or_new(&self.target) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!("{}; starting a new history", e);
                OperationLog::new(self.target.clone())
            }
        };
        // Alongside backups from earlier runs are not files to organize
        for backup in history.backup_paths() {
            self.walker.add_skip_path(backup);
        }
        let recorded_before = history.operations.len();
        let mut report = RunReport::default();

        tracing::info!(
            "{}Organizing '{}'",
            if dry_run { "[dry run] " } else { "" },
            self.target.display()
        );

        self.run_pass(Pass::Classify, &mut report, &mut history, progress);
        self.run_pass(Pass::Sweep, &mut report, &mut history, progress);
        progress.finish();

        report.history_saved = true;
        if !dry_run && history.operations.len() > recorded_before {
            if let Err(e) = history.save(&self.target) {
                tracing::error!("{}", e);
                report.history_saved = false;
            }
        }

        tracing::info!(
            "Run complete: {} moved, {} skipped, {} failed",
            report.moved(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn run_pass(
        &mut self,
        pass: Pass,
        report: &mut RunReport,
        history: &mut OperationLog,
        progress: &mut dyn ProgressSink,
    ) {
        // Collected up front: the pass moves files around inside the tree it walks
        let work: Vec<(FileRecord, Category)> = self
            .walker
            .files()
            .map(|record| {
                let category = self.classifier.classify(&record.file_name);
                (record, category)
            })
            .filter(|(_, category)| match pass {
                Pass::Classify => !category.is_unclassified(),
                Pass::Sweep => category.is_unclassified(),
            })
            .collect();

        progress.start(pass, work.len() as u64);
        for (record, category) in work {
            let outcome = self.mover.process(&record, category);
            if let MoveOutcome::Moved { operation, .. } = &outcome
                && let Some(backup) = &operation.backup_path
            {
                self.walker.add_skip_path(backup);
            }
            report.absorb(&record, &outcome, history);
            progress.advance(&record, &outcome);
        }
    }
}

/// Builds the backup manager, mover and organizer for a target in one go.
pub fn organizer_for<'a>(
    target: &Path,
    classifier: Classifier,
    walker: Walker,
    backups: BackupManager,
    mode: MoveMode,
    skip_existing: bool,
    confirm: Box<dyn crate::mover::Confirm + 'a>,
) -> Organizer<'a> {
    let mover = Mover::new(target, mode, skip_existing, backups, confirm);
    Organizer::new(target, classifier, walker, mover)
}
