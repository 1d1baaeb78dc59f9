//! Folder mode: migrate many files independently and summarize.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::MigrationError;
use crate::migrator::Migrator;

const SWIFT_EXTENSION: &str = "swift";
const BACKUP_SUFFIX: &str = ".backup";

/// Every `*.swift` file below `root`, sorted.
pub fn collect_swift_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == SWIFT_EXTENSION))
        .collect();
    files.sort();
    files
}

/// `Foo.swift` -> `Foo.swift.backup`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Classify only; never write.
    pub dry_run: bool,
    /// Copy each converted file to `<file>.backup` before overwriting it.
    pub backup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Converted,
    AlreadyMigrated,
    Unsupported { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub converted: usize,
    pub already_migrated: usize,
    pub unsupported: usize,
    pub dry_run: bool,
    pub files: Vec<FileResult>,
}

impl BatchSummary {
    fn from_results(mut files: Vec<FileResult>, dry_run: bool) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        let count = |wanted: fn(&FileOutcome) -> bool| {
            files.iter().filter(|file| wanted(&file.outcome)).count()
        };
        Self {
            converted: count(|outcome| matches!(outcome, FileOutcome::Converted)),
            already_migrated: count(|outcome| matches!(outcome, FileOutcome::AlreadyMigrated)),
            unsupported: count(|outcome| matches!(outcome, FileOutcome::Unsupported { .. })),
            dry_run,
            files,
        }
    }
}

/// Migrate every file in parallel. A failing file is reported and left
/// untouched; it never stops the batch.
pub fn run_batch(migrator: &Migrator, files: &[PathBuf], options: BatchOptions) -> BatchSummary {
    let results: Vec<FileResult> = files
        .par_iter()
        .map(|path| {
            let outcome = match migrate_one(migrator, path, options) {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping file");
                    FileOutcome::Unsupported {
                        reason: err.to_string(),
                    }
                }
            };
            FileResult {
                path: path.clone(),
                outcome,
            }
        })
        .collect();
    let summary = BatchSummary::from_results(results, options.dry_run);
    debug!(
        converted = summary.converted,
        already_migrated = summary.already_migrated,
        unsupported = summary.unsupported,
        "batch finished"
    );
    summary
}

fn migrate_one(
    migrator: &Migrator,
    path: &Path,
    options: BatchOptions,
) -> Result<FileOutcome, MigrationError> {
    let source = fs::read_to_string(path).map_err(|source| MigrationError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let migrated = migrator.migrate(&source)?;
    if migrated == source {
        return Ok(FileOutcome::AlreadyMigrated);
    }
    if options.dry_run {
        return Ok(FileOutcome::Converted);
    }

    if options.backup {
        let backup = backup_path(path);
        fs::write(&backup, &source).map_err(|source| MigrationError::FileWrite {
            path: backup.clone(),
            source,
        })?;
    }
    fs::write(path, migrated).map_err(|source| MigrationError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FileOutcome::Converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const LEGACY: &str = "import XCTest\n\nfinal class FooTests: XCTestCase {\n    func testOne() {\n        XCTAssertTrue(flag)\n    }\n}\n";
    const EXPECTATIONS: &str = "import XCTest\n\nfinal class FooTests: XCTestCase {\n    func testWait() {\n        let done = expectation(description: \"done\")\n        waitForExpectations(timeout: 1)\n    }\n}\n";

    #[test]
    fn collects_only_swift_files_in_order() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/B.swift"), "").unwrap();
        fs::write(dir.path().join("A.swift"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();

        let files = collect_swift_files(dir.path());
        assert_eq!(
            files,
            vec![dir.path().join("A.swift"), dir.path().join("nested/B.swift")]
        );
    }

    #[test]
    fn backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("Tests/FooTests.swift")),
            PathBuf::from("Tests/FooTests.swift.backup")
        );
    }

    #[test]
    fn classifies_each_file() {
        let dir = tempdir().unwrap();
        let legacy = dir.path().join("Legacy.swift");
        let plain = dir.path().join("Plain.swift");
        let waits = dir.path().join("Waits.swift");
        fs::write(&legacy, LEGACY).unwrap();
        fs::write(&plain, "struct Point {}\n").unwrap();
        fs::write(&waits, EXPECTATIONS).unwrap();

        let files = collect_swift_files(dir.path());
        let summary = run_batch(&Migrator::default(), &files, BatchOptions::default());

        assert_eq!(summary.converted, 1);
        assert_eq!(summary.already_migrated, 1);
        assert_eq!(summary.unsupported, 1);
        assert_eq!(summary.files[0].path, legacy);
        assert!(matches!(
            &summary.files[2].outcome,
            FileOutcome::Unsupported { reason } if reason.contains("expectations")
        ));
        assert!(fs::read_to_string(&legacy).unwrap().contains("import Testing"));
        assert_eq!(fs::read_to_string(&waits).unwrap(), EXPECTATIONS);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let legacy = dir.path().join("Legacy.swift");
        fs::write(&legacy, LEGACY).unwrap();

        let options = BatchOptions {
            dry_run: true,
            backup: true,
        };
        let summary = run_batch(&Migrator::default(), &[legacy.clone()], options);

        assert_eq!(summary.converted, 1);
        assert!(summary.dry_run);
        assert_eq!(fs::read_to_string(&legacy).unwrap(), LEGACY);
        assert!(!backup_path(&legacy).exists());
    }

    #[test]
    fn backup_keeps_the_original() {
        let dir = tempdir().unwrap();
        let legacy = dir.path().join("Legacy.swift");
        fs::write(&legacy, LEGACY).unwrap();

        let options = BatchOptions {
            dry_run: false,
            backup: true,
        };
        run_batch(&Migrator::default(), &[legacy.clone()], options);

        assert_eq!(fs::read_to_string(backup_path(&legacy)).unwrap(), LEGACY);
    }

    #[test]
    fn summary_serializes_with_status_tags() {
        let summary = BatchSummary::from_results(
            vec![FileResult {
                path: PathBuf::from("A.swift"),
                outcome: FileOutcome::Unsupported {
                    reason: "nope".into(),
                },
            }],
            false,
        );
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["unsupported"], 1);
        assert_eq!(json["files"][0]["status"], "unsupported");
        assert_eq!(json["files"][0]["reason"], "nope");
        assert_eq!(json["files"][0]["path"], "A.swift");
    }
}
