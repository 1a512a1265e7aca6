//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored status lines, the organize
//! progress bar, the duplicate list and the statistics table.

use crate::duplicates::DuplicatePair;
use crate::mover::{MoveOutcome, SkipReason};
use crate::organizer::{Pass, ProgressSink, RunReport};
use crate::stats::Stats;
use crate::undo::UndoReport;
use crate::walker::FileRecord;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Progress bars and summary tables
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foldertidy::output::OutputFormatter;
    /// OutputFormatter::success("Folder organized!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for one pass of file operations.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use foldertidy::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_with_message("Completed!");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints one `Duplicate: '<a>' and '<b>'` line per pair.
    pub fn print_duplicates(pairs: &[DuplicatePair]) {
        Self::header("DUPLICATES");
        if pairs.is_empty() {
            Self::plain("No duplicate files found.");
            return;
        }
        for line in duplicate_lines(pairs) {
            Self::warning(&line);
        }
    }

    /// Prints the `<category>: <n> files` lines and a total.
    pub fn print_stats(stats: &Stats) {
        Self::header("STATISTICS");
        if stats.is_empty() {
            Self::plain("No files were moved.");
            return;
        }
        for line in stats.report_lines() {
            println!("{}", line);
        }
        println!("{}", "-".repeat(24));
        println!(
            "{} {}",
            "Total:".bold(),
            format!("{} files", stats.total()).green().bold()
        );
    }

    /// Prints what an organize run did.
    pub fn print_run_summary(report: &RunReport, dry_run: bool) {
        Self::header("SUMMARY");
        let verb = if dry_run { "Would move" } else { "Moved" };
        Self::success(&format!("{} {} file(s)", verb, report.moved()));

        if report.already_in_place > 0 {
            Self::plain(&format!(
                "{} file(s) already organized",
                report.already_in_place
            ));
        }

        if !report.skipped.is_empty() {
            Self::warning(&format!("Skipped {} file(s):", report.skipped.len()));
            for (path, reason) in &report.skipped {
                let reason = match reason {
                    SkipReason::Conflict => "destination already exists",
                    SkipReason::Declined => "not confirmed",
                };
                println!("    - {}: {}", path.display(), reason);
            }
        }

        if !report.failed.is_empty() {
            Self::error(&format!("Failed {} file(s):", report.failed.len()));
            for (path, reason) in &report.failed {
                eprintln!("    - {}: {}", path.display(), reason);
            }
        }

        if !report.history_saved {
            Self::warning("History could not be saved. Undo will rely on the backup layout.");
        }
    }

    pub fn print_undo_report(report: &UndoReport, dry_run: bool) {
        Self::header("UNDO");
        let verb = if dry_run { "Would restore" } else { "Restored" };
        Self::success(&format!("{} {} file(s)", verb, report.restored_files));

        if !report.skipped_files.is_empty() {
            Self::warning(&format!("Skipped: {}", report.skipped_files.len()));
            for (path, reason) in &report.skipped_files {
                println!("    - {}: {}", path.display(), reason);
            }
        }

        if !report.failed_restores.is_empty() {
            Self::error(&format!("Failed: {}", report.failed_restores.len()));
            for (path, reason) in &report.failed_restores {
                eprintln!("    - {}: {}", path.display(), reason);
            }
        }
    }
}

/// Plain report lines for a duplicate scan.
pub fn duplicate_lines(pairs: &[DuplicatePair]) -> Vec<String> {
    pairs.iter().map(ToString::to_string).collect()
}

impl ProgressSink for ProgressBar {
    fn start(&mut self, pass: Pass, total: u64) {
        self.set_length(total);
        self.set_position(0);
        self.set_message(pass.label());
    }

    fn advance(&mut self, record: &FileRecord, _outcome: &MoveOutcome) {
        self.set_message(record.file_name.clone());
        self.inc(1);
    }

    fn finish(&mut self) {
        self.finish_and_clear();
    }
}
