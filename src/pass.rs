//! The organizer pass.
//!
//! A pass lists the target directory once, then handles each entry of that
//! snapshot in order: directories are skipped, files are moved into the
//! category folder derived from their extension. A failure on one entry is
//! recorded and the pass moves on; only a failure to list the directory
//! ends the pass early.

use crate::events::{EventSink, PassEvent};
use crate::file_category::CategoryFolder;
use crate::file_organizer::{FileOrganizer, OrganizeError};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop a pass, or prevent it from starting.
#[derive(Debug, Error)]
pub enum PassError {
    #[error("target directory {} does not exist", .0.display())]
    TargetNotFound(PathBuf),
    #[error("target path {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot access target directory {}: {source}", .path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Final state of one directory entry.
#[derive(Debug)]
pub enum EntryStatus {
    /// The entry is a directory and was left alone.
    Skipped,
    /// The file now lives at `destination`.
    Moved {
        folder: CategoryFolder,
        destination: PathBuf,
    },
    /// Dry run: the file would have been moved into `folder`.
    Planned { folder: CategoryFolder },
    /// The file could not be moved and stays where it was.
    Failed {
        folder: CategoryFolder,
        error: OrganizeError,
    },
}

/// The outcome reported for one entry of the snapshot.
#[derive(Debug)]
pub struct EntryOutcome {
    /// Entry name, lossily converted for display.
    pub name: String,
    /// Full path of the entry before the pass touched it.
    pub path: PathBuf,
    pub status: EntryStatus,
}

impl EntryOutcome {
    /// The category folder of this entry, if it is a file.
    pub fn folder(&self) -> Option<&CategoryFolder> {
        match &self.status {
            EntryStatus::Skipped => None,
            EntryStatus::Moved { folder, .. }
            | EntryStatus::Planned { folder }
            | EntryStatus::Failed { folder, .. } => Some(folder),
        }
    }
}

/// Everything a completed pass did.
#[derive(Debug)]
pub struct PassReport {
    pub target: PathBuf,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One outcome per snapshot entry, in processing order.
    pub outcomes: Vec<EntryOutcome>,
}

impl PassReport {
    pub fn moved_count(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Moved { .. }))
    }

    pub fn planned_count(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Planned { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Skipped))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, EntryStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&EntryStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    /// Number of files moved (or planned, in a dry run) per category folder.
    pub fn folder_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for outcome in &self.outcomes {
            if let EntryStatus::Moved { folder, .. } | EntryStatus::Planned { folder } =
                &outcome.status
            {
                *counts.entry(folder.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, EntryStatus::Failed { .. }))
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Checks that `path` exists and is a directory.
///
/// Symlinks are followed, so a link to a directory is accepted.
pub fn validate_target_dir(path: &Path) -> Result<(), PassError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PassError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(PassError::TargetNotFound(path.to_path_buf()))
        }
        Err(e) => Err(PassError::Inaccessible {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// One non-recursive reorganization of a directory.
#[derive(Debug, Clone)]
pub struct OrganizerPass {
    target: PathBuf,
    dry_run: bool,
}

impl OrganizerPass {
    /// Creates a pass over `target`, which must already be validated.
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            dry_run: false,
        }
    }

    /// Classify only: no folders are created and nothing is moved.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Runs the pass, reporting every event to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`PassError::ReadDirFailed`] when the directory listing
    /// cannot be taken. Per-entry failures are part of the report instead.
    pub fn run(&self, sink: &mut dyn EventSink) -> Result<PassReport, PassError> {
        let started_at = Utc::now();

        let names = match self.snapshot() {
            Ok(names) => names,
            Err(e) => {
                sink.record(&PassEvent::Aborted(&e));
                return Err(e);
            }
        };

        sink.record(&PassEvent::Started {
            target: &self.target,
            entries: names.len(),
            dry_run: self.dry_run,
        });

        let mut outcomes = Vec::with_capacity(names.len());
        for name in names {
            let outcome = self.process_entry(name);
            sink.record(&PassEvent::Entry(&outcome));
            outcomes.push(outcome);
        }

        let report = PassReport {
            target: self.target.clone(),
            dry_run: self.dry_run,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        sink.record(&PassEvent::Completed(&report));

        Ok(report)
    }

    /// Lists the entry names of the target once, sorted.
    fn snapshot(&self) -> Result<Vec<OsString>, PassError> {
        let read_failed = |source| PassError::ReadDirFailed {
            path: self.target.clone(),
            source,
        };

        let mut names = fs::read_dir(&self.target)
            .map_err(read_failed)?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_failed)?;
        names.sort();

        Ok(names)
    }

    fn process_entry(&self, name: OsString) -> EntryOutcome {
        let path = self.target.join(&name);
        let display_name = name.to_string_lossy().into_owned();

        if path.is_dir() {
            return EntryOutcome {
                name: display_name,
                path,
                status: EntryStatus::Skipped,
            };
        }

        let folder = CategoryFolder::for_file_name(&display_name);
        let status = if self.dry_run {
            EntryStatus::Planned { folder }
        } else {
            match FileOrganizer::move_to_category(&self.target, &path, &folder) {
                Ok(destination) => EntryStatus::Moved {
                    folder,
                    destination,
                },
                Err(error) => EntryStatus::Failed { folder, error },
            }
        };

        EntryOutcome {
            name: display_name,
            path,
            status,
        }
    }
}

/// Validates `target` and runs one pass over it.
///
/// Validation failures are reported to `sink` as critical before returning.
pub fn organize_directory(
    target: &Path,
    dry_run: bool,
    sink: &mut dyn EventSink,
) -> Result<PassReport, PassError> {
    if let Err(e) = validate_target_dir(target) {
        sink.record(&PassEvent::Aborted(&e));
        return Err(e);
    }
    OrganizerPass::new(target).with_dry_run(dry_run).run(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventLevel, MemorySink};
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name).expect("Failed to write test file");
    }

    #[test]
    fn test_pass_moves_files_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        touch(base, "report.pdf");
        touch(base, "photo.JPG");
        touch(base, "archive.tar.gz");
        touch(base, "README");
        fs::create_dir(base.join("old")).unwrap();

        let mut sink = MemorySink::new();
        let report = OrganizerPass::new(base).run(&mut sink).unwrap();

        assert_eq!(report.moved_count(), 4);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.failed_count(), 0);
        assert!(base.join("PDF_Files/report.pdf").is_file());
        assert!(base.join("JPG_Files/photo.JPG").is_file());
        assert!(base.join("GZ_Files/archive.tar.gz").is_file());
        assert!(base.join("No_Extension/README").is_file());
        assert!(base.join("old").is_dir());
    }

    #[test]
    fn test_snapshot_is_sorted_and_events_follow_it() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        touch(base, "b.txt");
        touch(base, "a.txt");

        let mut sink = MemorySink::new();
        let report = OrganizerPass::new(base).run(&mut sink).unwrap();

        let names: Vec<_> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        // started, two entries, completed
        assert_eq!(sink.events.len(), 4);
        assert!(sink.events[1].1.contains("a.txt"));
    }

    #[test]
    fn test_new_folders_are_not_revisited() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        touch(base, "z.txt");

        let mut sink = MemorySink::new();
        let report = OrganizerPass::new(base).run(&mut sink).unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.skipped_count(), 0);
    }

    #[test]
    fn test_failure_does_not_stop_pass() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::create_dir(base.join("PDF_Files")).unwrap();
        touch(&base.join("PDF_Files"), "a.pdf");
        touch(base, "a.pdf");
        touch(base, "b.txt");

        let mut sink = MemorySink::new();
        let report = OrganizerPass::new(base).run(&mut sink).unwrap();

        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.moved_count(), 1);
        assert!(base.join("a.pdf").exists());
        assert!(base.join("TXT_Files/b.txt").exists());
        assert_eq!(sink.messages_at(EventLevel::Error).len(), 1);
        assert_eq!(sink.messages_at(EventLevel::Warning).len(), 1);
        let failed: Vec<_> = report.failures().map(|o| o.name.as_str()).collect();
        assert_eq!(failed, vec!["a.pdf"]);
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        touch(base, "song.mp3");
        touch(base, "Makefile");

        let mut sink = MemorySink::new();
        let report = OrganizerPass::new(base)
            .with_dry_run(true)
            .run(&mut sink)
            .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.planned_count(), 2);
        assert_eq!(report.moved_count(), 0);
        assert!(base.join("song.mp3").exists());
        assert!(!base.join("MP3_Files").exists());
        assert!(!base.join("No_Extension").exists());

        let counts = report.folder_counts();
        assert_eq!(counts.get("MP3_Files"), Some(&1));
        assert_eq!(counts.get("No_Extension"), Some(&1));
    }

    #[test]
    fn test_missing_directory_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let mut sink = MemorySink::new();
        let err = OrganizerPass::new(&missing).run(&mut sink).unwrap_err();

        assert!(matches!(err, PassError::ReadDirFailed { .. }));
        assert_eq!(sink.messages_at(EventLevel::Critical).len(), 1);
    }

    #[test]
    fn test_validate_target_dir() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        touch(base, "file.txt");

        assert!(validate_target_dir(base).is_ok());
        assert!(matches!(
            validate_target_dir(&base.join("file.txt")),
            Err(PassError::NotADirectory(_))
        ));
        assert!(matches!(
            validate_target_dir(&base.join("missing")),
            Err(PassError::TargetNotFound(_))
        ));
    }

    #[test]
    fn test_organize_directory_reports_validation_failure() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        touch(temp_dir.path(), "plain.txt");

        let mut sink = MemorySink::new();
        let err = organize_directory(&file, false, &mut sink).unwrap_err();

        assert!(matches!(err, PassError::NotADirectory(_)));
        assert_eq!(sink.messages_at(EventLevel::Critical).len(), 1);
        assert!(file.is_file());
    }
}
