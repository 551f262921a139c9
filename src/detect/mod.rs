use std::collections::BTreeSet;
use std::mem;
use std::path::{Path, PathBuf};

use fnv::FnvHashSet;

use crate::compare_files::ContentComparer;
use crate::detect::util::*;
use crate::error::SyncError;

mod util;
pub use crate::detect::util::{check_all_roots_exist, list_directory, DirectoryListing};

/// A replica entry whose comparison could not be completed.
#[derive(Debug)]
pub struct ComparisonFault {
    pub path: PathBuf,
    pub error: SyncError,
    /// True if the entry was kept as a deletion candidate, false if it was left alone
    /// because the source side could not be read.
    pub marked: bool,
}

/// The replica entries that have no valid counterpart in the source.
///
/// A directory is removed together with everything below it, so an entry is not stored
/// when one of its ancestors already is, and adding a directory drops any entries
/// already stored beneath it.
///
/// The set also remembers which replica files were proven content-equal, and which
/// comparisons failed.
#[derive(Debug, Default)]
pub struct DeletionSet {
    files: BTreeSet<PathBuf>,
    directories: BTreeSet<PathBuf>,
    unchanged: BTreeSet<PathBuf>,
    faults: Vec<ComparisonFault>,
}

impl DeletionSet {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_file(&mut self, path: PathBuf) {
        if self.covered_by_directory(&path) {
            trace!("Not adding file {:?}, a parent directory is already marked", path);
            return;
        }
        self.files.insert(path);
    }

    pub fn add_directory(&mut self, path: PathBuf) {
        if self.covered_by_directory(&path) {
            trace!("Not adding nested directory {:?}", path);
            return;
        }
        self.files.retain(|other| {
            let nested = other.starts_with(&path);
            if nested {
                trace!("Removing nested file {:?}", other);
            }
            !nested
        });
        self.directories.retain(|other| !other.starts_with(&path));
        self.directories.insert(path);
    }

    /// Files to delete, in path order.
    pub fn files(&self) -> &BTreeSet<PathBuf> {
        &self.files
    }

    /// Directories to delete recursively, in path order.
    pub fn directories(&self) -> &BTreeSet<PathBuf> {
        &self.directories
    }

    /// Returns true if deleting this set removes `path`.
    pub fn covers(&self, path: &Path) -> bool {
        self.files.contains(path) || self.covered_by_directory(path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    /// Replica files proven content-equal which survive the deletions.
    pub fn unchanged_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.unchanged.iter().filter(move |path| !self.covers(path))
    }

    pub fn faults(&self) -> &[ComparisonFault] {
        &self.faults
    }

    /// Hands over the recorded faults, leaving none behind.
    pub fn take_faults(&mut self) -> Vec<ComparisonFault> {
        mem::replace(&mut self.faults, Vec::new())
    }

    fn add_fault(&mut self, path: PathBuf, error: SyncError, marked: bool) {
        warn!("Could not compare {:?}: {}", path, error);
        self.faults.push(ComparisonFault { path, error, marked });
    }

    fn covered_by_directory(&self, path: &Path) -> bool {
        path.ancestors().any(|ancestor| self.directories.contains(ancestor))
    }
}

/// Returns the files directly inside `replica` which have no same-named, content-equal
/// file directly inside `source`. Nothing is modified.
///
/// A replica file that cannot be read is returned too, since it was not proven equal.
/// A replica file whose source counterpart cannot be read is left out.
pub fn excess_files(replica: &Path, source: &Path, comparer: &ContentComparer) -> Result<Vec<PathBuf>, SyncError> {
    let replica_listing = list_directory(replica)?;
    let source_listing = list_directory(source)?;
    Ok(excess_files_in(&replica_listing, &source_listing, comparer, &mut DeletionSet::new()))
}

/// Returns every replica directory below `replica` that should be removed, together with
/// the excess files found while descending through directories present on both sides.
pub fn excess_directories(replica: &Path, source: &Path, comparer: &ContentComparer) -> Result<DeletionSet, SyncError> {
    let replica_listing = list_directory(replica)?;
    let source_listing = list_directory(source)?;
    let mut deletions = DeletionSet::new();
    collect_excess_directories(&replica_listing, &source_listing, comparer, &mut deletions);
    Ok(deletions)
}

/// Computes everything that must be removed from `replica` for it to mirror `source`:
/// the excess files at the top level plus the result of `excess_directories`.
///
/// Only a failure to list either root is an error. Failures on individual entries are
/// recorded in the returned set as faults.
pub fn find_deletions(replica: &Path, source: &Path, comparer: &ContentComparer) -> Result<DeletionSet, SyncError> {
    debug!("Finding deletions in {:?} against {:?}", replica, source);
    let replica_listing = list_directory(replica)?;
    let source_listing = list_directory(source)?;

    let mut deletions = DeletionSet::new();
    for file in excess_files_in(&replica_listing, &source_listing, comparer, &mut deletions) {
        deletions.add_file(file);
    }
    collect_excess_directories(&replica_listing, &source_listing, comparer, &mut deletions);
    Ok(deletions)
}

fn excess_files_in(
    replica: &DirectoryListing,
    source: &DirectoryListing,
    comparer: &ContentComparer,
    deletions: &mut DeletionSet,
) -> Vec<PathBuf> {
    let replica_by_name = index_by_name(&replica.files);
    let mut keep: FnvHashSet<&Path> = Default::default();

    for source_file in &source.files {
        let name = match source_file.file_name() {
            Some(name) => name,
            None => continue,
        };
        let replica_file = match replica_by_name.get(name) {
            Some(replica_file) => *replica_file,
            None => continue,
        };

        match comparer.are_equal(replica_file, source_file) {
            Ok(true) => {
                keep.insert(replica_file);
                deletions.unchanged.insert(replica_file.to_path_buf());
            }
            Ok(false) => info!("Difference at {:?} - file contents not equal", replica_file),
            Err(e) => {
                // the replica copy is read first, so a source path means the replica was fine
                let source_unreadable = e.unreadable_path() == Some(source_file.as_path());
                if source_unreadable {
                    keep.insert(replica_file);
                }
                deletions.add_fault(replica_file.to_path_buf(), e, !source_unreadable);
            }
        }
    }

    replica
        .files
        .iter()
        .filter(|file| !keep.contains(&file.as_path()))
        .cloned()
        .collect()
}

fn collect_excess_directories(
    replica: &DirectoryListing,
    source: &DirectoryListing,
    comparer: &ContentComparer,
    deletions: &mut DeletionSet,
) {
    let source_by_name = index_by_name(&source.directories);

    for replica_dir in &replica.directories {
        let source_dir = match replica_dir.file_name().and_then(|name| source_by_name.get(name)) {
            Some(source_dir) => *source_dir,
            None => {
                info!("Directory {:?} has no counterpart in the source", replica_dir);
                deletions.add_directory(replica_dir.clone());
                continue;
            }
        };

        let replica_children = match list_directory(replica_dir) {
            Ok(listing) => listing,
            Err(e) => {
                deletions.add_fault(replica_dir.clone(), e, true);
                deletions.add_directory(replica_dir.clone());
                continue;
            }
        };
        let source_children = match list_directory(source_dir) {
            Ok(listing) => listing,
            Err(e) => {
                deletions.add_fault(replica_dir.clone(), e, false);
                continue;
            }
        };

        let excess = excess_files_in(&replica_children, &source_children, comparer, deletions);
        if !excess.is_empty() {
            info!("Directory {:?} holds {} out of date file(s)", replica_dir, excess.len());
            deletions.add_directory(replica_dir.clone());
            for file in excess {
                deletions.add_file(file);
            }
        }

        // siblings accumulate into the same set
        collect_excess_directories(&replica_children, &source_children, comparer, deletions);
    }
}
