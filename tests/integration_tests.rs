use foldertidy::cli::{CommandReport, OrganizeCommand, RunOptions, run_cli_with_confirm};
/// Integration tests for foldertidy
///
/// These tests simulate real-world usage scenarios, testing the complete
/// end-to-end behavior of the folder organizer.
///
/// Test categories:
/// 1. Basic organization workflows
/// 2. Dry-run mode verification
/// 3. Conflicts, backups and undo
/// 4. Duplicates and statistics
/// 5. Configuration and filtering
/// 6. Interactive mode
use foldertidy::duplicates::DuplicatePair;
use foldertidy::hasher::hash_file;
use foldertidy::logging::{file_subscriber, log_file_path};
use foldertidy::mover::MoveMode;
use foldertidy::organizer::RunReport;
use foldertidy::undo::UndoReport;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture that sets up a temporary directory with configurable
/// file structure for testing.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file with content, creating parent folders as needed.
    fn create_file(&self, rel_path: &str, content: &str) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write file content");
    }

    /// Options with backups going to `<target>/backup`, like the CLI default.
    fn options(&self) -> RunOptions {
        let mut options = RunOptions::new(self.path());
        options.backup_dir = Some(self.path().join("backup"));
        options
    }

    fn run(&self, command: OrganizeCommand, options: &RunOptions) -> CommandReport {
        run_cli_with_confirm(command, options, Box::new(|_: &Path, _: &Path| true))
            .expect("Command failed")
    }

    fn organize(&self, options: &RunOptions) -> (RunReport, Option<Vec<DuplicatePair>>) {
        match self.run(OrganizeCommand::Organize, options) {
            CommandReport::Organized { report, duplicates } => (report, duplicates),
            other => panic!("Expected an organize report, got {:?}", other),
        }
    }

    fn undo(&self, options: &RunOptions) -> UndoReport {
        match self.run(OrganizeCommand::Undo, options) {
            CommandReport::Undone(report) => report,
            other => panic!("Expected an undo report, got {:?}", other),
        }
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    /// Relative path -> content for every file, leaving out the run log.
    fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        Self::walk_dir(self.path(), self.path(), &mut files);
        files.remove(Path::new("filemover.log"));
        files
    }

    fn walk_dir(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    let rel = path.strip_prefix(root).unwrap().to_path_buf();
                    files.insert(rel, fs::read(&path).unwrap());
                } else if path.is_dir() {
                    Self::walk_dir(root, &path, files);
                }
            }
        }
    }
}

// ============================================================================
// Test Suite 1: Basic Organization
// ============================================================================

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    let (report, _) = fixture.organize(&fixture.options());

    assert_eq!(report.moved(), 0);
    assert!(fixture.snapshot().is_empty());
}

#[test]
fn test_organize_mapped_and_unclassified_files() {
    let fixture = TestFixture::new();
    fixture.create_file("a.pdf", "pdf");
    fixture.create_file("b.exe", "exe");
    fixture.create_file("c.xyz", "xyz");

    let mut options = fixture.options();
    options.stats = true;
    let (report, _) = fixture.organize(&options);

    fixture.assert_file_exists("Documents/a.pdf");
    fixture.assert_file_exists("Executable/b.exe");
    fixture.assert_file_exists("Unclassified/c.xyz");
    fixture.assert_file_not_exists("a.pdf");
    fixture.assert_file_not_exists("b.exe");
    fixture.assert_file_not_exists("c.xyz");

    let lines = report.stats.report_lines();
    assert!(lines.contains(&"Documents: 1 files".to_string()));
    assert!(lines.contains(&"Executable: 1 files".to_string()));
    assert!(lines.contains(&"Unclassified: 1 files".to_string()));
}

#[test]
fn test_organize_nested_files() {
    let fixture = TestFixture::new();
    fixture.create_file("inbox/2024/scan.jpg", "jpg");
    fixture.create_file("inbox/notes.txt", "txt");

    fixture.organize(&fixture.options());

    fixture.assert_file_exists("Images/scan.jpg");
    fixture.assert_file_exists("Documents/notes.txt");
    fixture.assert_file_not_exists("inbox/2024/scan.jpg");
}

#[test]
fn test_files_without_extension_are_unclassified() {
    let fixture = TestFixture::new();
    fixture.create_file("README", "readme");
    fixture.create_file("archive.tar.ZIP", "zip");

    fixture.organize(&fixture.options());

    fixture.assert_file_exists("Unclassified/README");
    fixture.assert_file_exists("Compress/archive.tar.ZIP");
}

#[test]
fn test_organize_is_idempotent() {
    let fixture = TestFixture::new();
    fixture.create_file("a.pdf", "pdf");
    fixture.create_file("c.xyz", "xyz");

    fixture.organize(&fixture.options());
    let after_first = fixture.snapshot();
    let (second, _) = fixture.organize(&fixture.options());

    assert_eq!(second.moved(), 0);
    assert_eq!(second.already_in_place, 2);
    assert_eq!(fixture.snapshot(), after_first);
}

#[test]
fn test_organize_preserves_file_content() {
    let fixture = TestFixture::new();
    fixture.create_file("report final (v2).docx", "quarterly numbers");

    fixture.organize(&fixture.options());

    assert_eq!(
        fixture.read("Documents/report final (v2).docx"),
        "quarterly numbers"
    );
}

#[test]
fn test_missing_target_is_fatal() {
    let options = RunOptions::new("/non/existent/folder");
    let result = run_cli_with_confirm(
        OrganizeCommand::Organize,
        &options,
        Box::new(|_: &Path, _: &Path| true),
    );
    assert!(result.is_err());
}

// ============================================================================
// Test Suite 2: Dry-Run Mode
// ============================================================================

#[test]
fn test_dry_run_doesnt_touch_the_tree() {
    let fixture = TestFixture::new();
    fixture.create_file("a.pdf", "pdf");
    fixture.create_file("b.exe", "exe");
    fixture.create_file("sub/c.xyz", "xyz");
    let before = fixture.snapshot();

    let mut options = fixture.options();
    options.mode = MoveMode::DryRun;
    let (report, _) = fixture.organize(&options);

    assert_eq!(fixture.snapshot(), before);
    assert_eq!(report.stats.get("Documents"), 1);
    assert_eq!(report.stats.get("Executable"), 1);
    assert_eq!(report.stats.get("Unclassified"), 1);
    assert!(!fixture.path().join("backup").exists());
}

#[test]
fn test_dry_run_undo_lists_without_restoring() {
    let fixture = TestFixture::new();
    fixture.create_file("a.pdf", "pdf");
    fixture.organize(&fixture.options());
    let before = fixture.snapshot();

    let mut options = fixture.options();
    options.mode = MoveMode::DryRun;
    let report = fixture.undo(&options);

    assert_eq!(report.restored_files, 1);
    assert_eq!(fixture.snapshot(), before);
}

// ============================================================================
// Test Suite 3: Conflicts, Backups and Undo
// ============================================================================

#[test]
fn test_existing_destination_is_skipped_with_warning() {
    let fixture = TestFixture::new();
    fixture.create_file("Documents/a.pdf", "already here");
    fixture.create_file("a.pdf", "newcomer");

    let subscriber = file_subscriber(fixture.path()).expect("Failed to open log");
    let (report, _) = tracing::subscriber::with_default(subscriber, || {
        fixture.organize(&fixture.options())
    });

    assert_eq!(fixture.read("a.pdf"), "newcomer");
    assert_eq!(fixture.read("Documents/a.pdf"), "already here");
    assert_eq!(report.skipped.len(), 1);

    let log = fs::read_to_string(log_file_path(fixture.path())).unwrap();
    assert!(log.contains("WARN"), "log was: {}", log);
    assert!(log.contains("already exists"), "log was: {}", log);
}

#[test]
fn test_overwrite_replaces_existing_destination() {
    let fixture = TestFixture::new();
    fixture.create_file("Documents/a.pdf", "old");
    fixture.create_file("a.pdf", "new");

    let mut options = fixture.options();
    options.skip_existing = false;
    fixture.organize(&options);

    fixture.assert_file_not_exists("a.pdf");
    assert_eq!(fixture.read("Documents/a.pdf"), "new");
}

#[test]
fn test_backups_match_pre_move_content() {
    let fixture = TestFixture::new();
    fixture.create_file("a.pdf", "pdf bytes");
    fixture.create_file("b.png", "png bytes");
    fixture.create_file("c.xyz", "xyz bytes");

    let before: Vec<_> = ["a.pdf", "b.png", "c.xyz"]
        .iter()
        .map(|name| (*name, hash_file(&fixture.path().join(name)).unwrap()))
        .collect();

    fixture.organize(&fixture.options());

    for (name, hash) in before {
        let backup = fixture.path().join("backup").join(format!("{}.bak", name));
        assert_eq!(hash_file(&backup).unwrap(), hash, "backup of {}", name);
    }
}

#[test]
fn test_in_place_backups() {
    let fixture = TestFixture::new();
    fixture.create_file("a.pdf", "pdf");

    let options = RunOptions::new(fixture.path());
    fixture.organize(&options);

    fixture.assert_file_exists("Documents/a.pdf");
    fixture.assert_file_exists("a.pdf.bak");
}

#[test]
fn test_undo_restores_everything_once() {
    let fixture = TestFixture::new();
    fixture.create_file("a.pdf", "pdf");
    fixture.create_file("inbox/b.exe", "exe");
    fixture.create_file("c.xyz", "xyz");

    fixture.organize(&fixture.options());
    let first = fixture.undo(&fixture.options());
    let second = fixture.undo(&fixture.options());

    assert_eq!(first.restored_files, 3);
    assert!(first.is_complete_success());
    assert_eq!(second.restored_files, 0);
    assert_eq!(fixture.read("a.pdf"), "pdf");
    assert_eq!(fixture.read("inbox/b.exe"), "exe");
    assert_eq!(fixture.read("c.xyz"), "xyz");
    fixture.assert_file_not_exists("Documents/a.pdf");
    fixture.assert_file_not_exists("Unclassified/c.xyz");
}

#[test]
fn test_undo_without_backup_folder_is_a_no_op() {
    let fixture = TestFixture::new();
    fixture.create_file("a.pdf", "pdf");
    fixture.organize(&RunOptions::new(fixture.path()));
    let before = fixture.snapshot();

    let report = fixture.undo(&RunOptions::new(fixture.path()));

    assert_eq!(report.total_processed(), 0);
    assert_eq!(fixture.snapshot(), before);
}

#[test]
fn test_same_name_in_two_folders_round_trips() {
    let fixture = TestFixture::new();
    fixture.create_file("sub1/a.pdf", "one");
    fixture.create_file("sub2/a.pdf", "two");

    let (report, _) = fixture.organize(&fixture.options());
    assert_eq!(report.moved(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(fixture.read("backup/sub1/a.pdf.bak"), "one");
    fixture.assert_file_not_exists("backup/sub2/a.pdf.bak");

    let undo = fixture.undo(&fixture.options());

    assert!(undo.is_complete_success());
    assert_eq!(fixture.read("sub1/a.pdf"), "one");
    assert_eq!(fixture.read("sub2/a.pdf"), "two");
    fixture.assert_file_not_exists("Documents/a.pdf");
}

#[test]
fn test_failed_move_does_not_abort_the_run() {
    let fixture = TestFixture::new();
    fixture.create_file("Documents", "a file where a folder should be");
    fixture.create_file("a.pdf", "pdf");
    fixture.create_file("b.exe", "exe");

    let (report, _) = fixture.organize(&fixture.options());

    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("a.pdf"));
    assert_eq!(fixture.read("a.pdf"), "pdf");
    fixture.assert_file_exists("Executable/b.exe");
    fixture.assert_file_not_exists("backup/a.pdf.bak");
}

// ============================================================================
// Test Suite 4: Duplicates and Statistics
// ============================================================================

#[test]
fn test_identical_files_are_reported_once() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.jpg", "same bytes");
    fixture.create_file("photo copy.png", "same bytes");
    fixture.create_file("other.txt", "different");

    let mut options = fixture.options();
    options.stats = true;
    let (_, duplicates) = fixture.organize(&options);

    let duplicates = duplicates.expect("Duplicates requested");
    assert_eq!(duplicates.len(), 1);
    assert!(duplicates[0].contains(&fixture.path().join("Images").join("photo.jpg")));
    assert!(duplicates[0].contains(&fixture.path().join("Images").join("photo copy.png")));
    assert!(duplicates[0].to_string().starts_with("Duplicate: '"));
}

#[test]
fn test_distinct_files_have_no_duplicates() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "one");
    fixture.create_file("b.txt", "two");

    let mut options = fixture.options();
    options.stats = true;
    let (_, duplicates) = fixture.organize(&options);

    assert_eq!(duplicates, Some(Vec::new()));
}

#[test]
fn test_no_duplicate_scan_without_stats() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "same");
    fixture.create_file("b.txt", "same");

    let (_, duplicates) = fixture.organize(&fixture.options());
    assert!(duplicates.is_none());
}

// ============================================================================
// Test Suite 5: Configuration and Filtering
// ============================================================================

#[test]
fn test_mapping_file_in_target_overrides_defaults() {
    let fixture = TestFixture::new();
    fixture.create_file("config.json", r#"{"pdf": "Papers", ".xyz": "Mystery"}"#);
    fixture.create_file("a.pdf", "pdf");
    fixture.create_file("c.xyz", "xyz");
    fixture.create_file("b.exe", "exe");

    fixture.organize(&fixture.options());

    fixture.assert_file_exists("Papers/a.pdf");
    fixture.assert_file_exists("Mystery/c.xyz");
    fixture.assert_file_exists("Executable/b.exe");
    fixture.assert_file_exists("config.json");
}

#[test]
fn test_explicit_mapping_file() {
    let fixture = TestFixture::new();
    let settings_dir = TempDir::new().unwrap();
    let mapping = settings_dir.path().join("mapping.json");
    fs::write(&mapping, r#"{"log": "Logs"}"#).unwrap();
    fixture.create_file("server.log", "lines");

    let mut options = fixture.options();
    options.mapping = Some(mapping);
    fixture.organize(&options);

    fixture.assert_file_exists("Logs/server.log");
}

#[test]
fn test_user_bak_file_is_swept() {
    let fixture = TestFixture::new();
    fixture.create_file("old_settings.bak", "mine");

    fixture.organize(&fixture.options());

    fixture.assert_file_not_exists("old_settings.bak");
    assert_eq!(fixture.read("Unclassified/old_settings.bak"), "mine");
}

#[test]
fn test_bak_mapping_override() {
    let fixture = TestFixture::new();
    fixture.create_file("config.json", r#"{"bak": "Backups"}"#);
    fixture.create_file("old_settings.bak", "mine");

    fixture.organize(&fixture.options());

    assert_eq!(fixture.read("Backups/old_settings.bak"), "mine");
}

#[test]
fn test_invalid_mapping_is_fatal_before_any_move() {
    let fixture = TestFixture::new();
    fixture.create_file("config.json", "{ not json");
    fixture.create_file("a.pdf", "pdf");
    let before = fixture.snapshot();

    let result = run_cli_with_confirm(
        OrganizeCommand::Organize,
        &fixture.options(),
        Box::new(|_: &Path, _: &Path| true),
    );

    assert!(result.is_err());
    assert_eq!(fixture.snapshot(), before);
}

#[test]
fn test_invalid_settings_pattern_is_fatal() {
    let fixture = TestFixture::new();
    fixture.create_file(
        "settings.toml",
        r#"
[filters.exclude]
regex = ["[unclosed"]
"#,
    );
    fixture.create_file("a.pdf", "pdf");

    let mut options = fixture.options();
    options.settings = Some(fixture.path().join("settings.toml"));
    let result = run_cli_with_confirm(
        OrganizeCommand::Organize,
        &options,
        Box::new(|_: &Path, _: &Path| true),
    );

    assert!(result.is_err());
    fixture.assert_file_exists("a.pdf");
}

#[test]
fn test_settings_exclusions() {
    let fixture = TestFixture::new();
    fixture.create_file(
        "settings.toml",
        r#"
[filters]
enable_hidden_files = false

[filters.exclude]
patterns = ["*.tmp"]
filenames = ["keep.txt"]
"#,
    );
    fixture.create_file("a.pdf", "pdf");
    fixture.create_file("scratch.tmp", "tmp");
    fixture.create_file("keep.txt", "keep");
    fixture.create_file(".hidden.txt", "hidden");

    let mut options = fixture.options();
    options.settings = Some(fixture.path().join("settings.toml"));
    fixture.organize(&options);

    fixture.assert_file_exists("Documents/a.pdf");
    fixture.assert_file_exists("scratch.tmp");
    fixture.assert_file_exists("keep.txt");
    fixture.assert_file_exists(".hidden.txt");
    fixture.assert_file_exists("settings.toml");
}

#[test]
fn test_suffix_filter_and_excluded_folders() {
    let fixture = TestFixture::new();
    fixture.create_file("a.pdf", "pdf");
    fixture.create_file("b.exe", "exe");
    fixture.create_file("private/c.pdf", "pdf");

    let mut options = fixture.options();
    options.suffixes = vec![".pdf".to_string()];
    options.exclude_dirs = vec!["private".to_string()];
    fixture.organize(&options);

    fixture.assert_file_exists("Documents/a.pdf");
    fixture.assert_file_exists("b.exe");
    fixture.assert_file_exists("private/c.pdf");
    fixture.assert_file_not_exists("Unclassified/b.exe");
}

// ============================================================================
// Test Suite 6: Interactive Mode
// ============================================================================

#[test]
fn test_interactive_moves_only_confirmed_files() {
    let fixture = TestFixture::new();
    fixture.create_file("a.pdf", "pdf");
    fixture.create_file("b.exe", "exe");

    let mut options = fixture.options();
    options.mode = MoveMode::Interactive;
    let mut asked = Vec::new();
    let result = run_cli_with_confirm(
        OrganizeCommand::Organize,
        &options,
        Box::new(|file: &Path, _: &Path| {
            asked.push(file.to_path_buf());
            file.extension().is_some_and(|ext| ext == "pdf")
        }),
    );

    let report = match result.expect("Command failed") {
        CommandReport::Organized { report, .. } => report,
        other => panic!("Expected an organize report, got {:?}", other),
    };
    assert_eq!(asked.len(), 2);
    assert_eq!(report.moved(), 1);
    assert_eq!(report.skipped.len(), 1);
    fixture.assert_file_exists("Documents/a.pdf");
    fixture.assert_file_exists("b.exe");
}
