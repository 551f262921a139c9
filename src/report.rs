//! The textual record of what a sync cycle did.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{DescribeIoError, SyncError};

/// Format used for every timestamp in a report.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Something the cycle did or tried to do. Failed attempts carry their error.
#[derive(Debug)]
pub enum Action {
    CycleStarted,
    /// A root could not be listed, so nothing was deleted this cycle.
    ComparisonFailed(SyncError),
    /// One replica entry could not be compared. `marked` tells whether it was kept
    /// as a deletion candidate.
    CompareFailed { path: PathBuf, error: SyncError, marked: bool },
    DeleteFile { path: PathBuf, result: Result<(), SyncError> },
    NoFilesToDelete,
    DeleteFolder { path: PathBuf, result: Result<(), SyncError> },
    NoFoldersToDelete,
    CreateFolder { path: PathBuf, result: Result<(), SyncError> },
    CopyFile { source: PathBuf, dest: PathBuf, result: Result<(), SyncError> },
    NoFilesToCopy,
    /// Part of the source tree could not be enumerated.
    ReadFailed { path: PathBuf, error: SyncError },
}

impl Action {
    pub fn is_failure(&self) -> bool {
        match *self {
            Action::ComparisonFailed(_) | Action::CompareFailed { .. } | Action::ReadFailed { .. } => {
                true
            }
            Action::DeleteFile { ref result, .. }
            | Action::DeleteFolder { ref result, .. }
            | Action::CreateFolder { ref result, .. }
            | Action::CopyFile { ref result, .. } => result.is_err(),
            _ => false,
        }
    }

    /// True for successful deletions, folder creations and copies.
    pub fn changed_replica(&self) -> bool {
        match *self {
            Action::DeleteFile { ref result, .. }
            | Action::DeleteFolder { ref result, .. }
            | Action::CreateFolder { ref result, .. }
            | Action::CopyFile { ref result, .. } => result.is_ok(),
            _ => false,
        }
    }
}

/// A single line of the report.
#[derive(Debug)]
pub struct Record {
    pub time: DateTime<Local>,
    pub action: Action,
}

impl Record {
    pub fn now(action: Action) -> Self {
        Record { time: Local::now(), action }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let time = self.time.format(TIMESTAMP_FORMAT);
        match self.action {
            Action::CycleStarted => write!(f, "Sync started @ {}", time),
            Action::ComparisonFailed(ref e) => {
                write!(f, "Comparison failed, deletions skipped: {} -- {}", e, time)
            }
            Action::CompareFailed { ref path, ref error, marked: true } => write!(
                f,
                "Failed to compare {}: {}, marked for deletion -- {}",
                path.display(),
                error,
                time
            ),
            Action::CompareFailed { ref path, ref error, marked: false } => write!(
                f,
                "Failed to compare {}: {}, left in place -- {}",
                path.display(),
                error,
                time
            ),
            Action::DeleteFile { ref path, result: Ok(()) } => {
                write!(f, "deleted: {} -- {}", path.display(), time)
            }
            Action::DeleteFile { ref path, result: Err(ref e) } => {
                write!(f, "Failed to delete {}: {} -- {}", path.display(), e, time)
            }
            Action::NoFilesToDelete => write!(f, "No files to delete"),
            Action::DeleteFolder { ref path, result: Ok(()) } => {
                write!(f, "deleted folder: {} and all its files -- {}", path.display(), time)
            }
            Action::DeleteFolder { ref path, result: Err(ref e) } => {
                write!(f, "Failed to delete folder {}: {} -- {}", path.display(), e, time)
            }
            Action::NoFoldersToDelete => write!(f, "No folders to delete"),
            Action::CreateFolder { ref path, result: Ok(()) } => {
                write!(f, "Created folder: {} -- {}", path.display(), time)
            }
            Action::CreateFolder { ref path, result: Err(ref e) } => {
                write!(f, "Failed to create folder {}: {} -- {}", path.display(), e, time)
            }
            Action::CopyFile { ref source, ref dest, result: Ok(()) } => {
                write!(f, "Copied file: {} to {} -- {}", source.display(), dest.display(), time)
            }
            Action::CopyFile { ref source, ref dest, result: Err(ref e) } => write!(
                f,
                "Failed to copy file {} to {}: {} -- {}",
                source.display(),
                dest.display(),
                e,
                time
            ),
            Action::NoFilesToCopy => write!(f, "no files to copy"),
            Action::ReadFailed { ref path, ref error } => {
                write!(f, "Failed to read {}: {} -- {}", path.display(), error, time)
            }
        }
    }
}

/// The ordered, append-only record of one cycle.
#[derive(Debug, Default)]
pub struct SyncReport {
    records: Vec<Record>,
}

impl SyncReport {
    pub fn new() -> Self {
        Default::default()
    }

    /// Timestamps `action` and appends it, returning the new record.
    pub fn push(&mut self, action: Action) -> &Record {
        self.records.push(Record::now(action));
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn failures(&self) -> usize {
        self.records.iter().filter(|r| r.action.is_failure()).count()
    }

    /// True if the cycle left the replica untouched.
    pub fn is_quiet(&self) -> bool {
        !self.records.iter().any(|r| r.action.changed_replica())
    }

    /// Writes the report to `path`, replacing whatever was there.
    pub fn write_to(&self, path: &Path) -> Result<(), SyncError> {
        fs::write(path, self.to_string()).describe(|| format!("writing log file {:?}", path))
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        Ok(())
    }
}
