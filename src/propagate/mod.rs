use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fnv::FnvHashSet;
use walkdir::WalkDir;

use crate::error::{DescribeIoError, SyncError};
use crate::report::{Action, SyncReport};

mod progress;
pub use crate::propagate::progress::{ConsoleProgressCallback, EmptyProgressCallback, ProgressCallback};

/// Removes every file in `paths`. A failure is recorded and the remaining files are still
/// attempted.
pub fn delete_files<'a, I, T, P>(paths: I, options: &T, report: &mut SyncReport, progress: &P)
where
    I: IntoIterator<Item = &'a PathBuf>,
    T: PropagationOptions,
    P: ProgressCallback,
{
    let mut any = false;
    for path in paths {
        any = true;
        info!("Removing file {:?}", path);
        let result = options.remove_file(path);
        if let Err(ref e) = result {
            warn!("Failed to delete {:?}: {}", path, e);
        }
        record(report, progress, Action::DeleteFile { path: path.clone(), result });
    }

    if !any {
        record(report, progress, Action::NoFilesToDelete);
    }
}

/// Removes every directory in `paths` along with its contents, with the same per-entry
/// fault isolation as `delete_files`.
pub fn delete_folders<'a, I, T, P>(paths: I, options: &T, report: &mut SyncReport, progress: &P)
where
    I: IntoIterator<Item = &'a PathBuf>,
    T: PropagationOptions,
    P: ProgressCallback,
{
    let mut any = false;
    for path in paths {
        any = true;
        info!("Removing directory {:?}", path);
        let result = options.remove_dir_all(path);
        if let Err(ref e) = result {
            warn!("Failed to delete folder {:?}: {}", path, e);
        }
        record(report, progress, Action::DeleteFolder { path: path.clone(), result });
    }

    if !any {
        record(report, progress, Action::NoFoldersToDelete);
    }
}

/// Copies every file below `source` to the same relative position below `replica`,
/// creating directories on the way. Existing destination files are never overwritten.
///
/// Destinations listed in `unchanged` were already proven content-equal and are skipped.
pub fn copy_all<T, P>(
    source: &Path,
    replica: &Path,
    unchanged: &FnvHashSet<PathBuf>,
    options: &T,
    report: &mut SyncReport,
    progress: &P,
) where
    T: PropagationOptions,
    P: ProgressCallback,
{
    let mut found_files = false;
    let walk = WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()));

    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(source).to_path_buf();
                warn!("Failed to read {:?}: {}", path, e);
                record(report, progress, Action::ReadFailed { path, error: e.into() });
                continue;
            }
        };

        let relative_path = match entry.path().strip_prefix(source) {
            Ok(relative_path) => relative_path,
            Err(_) => continue,
        };
        let dest = replica.join(relative_path);

        if entry.file_type().is_dir() {
            if !dest.is_dir() {
                info!("Creating directory {:?}", dest);
                let result = options.create_dir_all(&dest);
                record(report, progress, Action::CreateFolder { path: dest, result });
            }
            continue;
        }

        found_files = true;
        if unchanged.contains(&dest) {
            debug!("{:?} is up to date", dest);
            continue;
        }

        let result = transfer_file(entry.path(), &dest, options);
        if let Err(ref e) = result {
            warn!("Failed to copy {:?}: {}", entry.path(), e);
        }
        record(
            report,
            progress,
            Action::CopyFile { source: entry.path().to_path_buf(), dest, result },
        );
    }

    if !found_files {
        record(report, progress, Action::NoFilesToCopy);
    }
}

fn transfer_file<T>(source: &Path, dest: &Path, options: &T) -> Result<(), SyncError>
where
    T: PropagationOptions,
{
    if let Some(parent) = dest.parent() {
        if !parent.exists() {
            info!("Creating parent directory {:?}", parent);
            options.create_dir_all(parent)?;
        }
    }
    info!("Transferring file {:?} to {:?}", source, dest);
    options.copy_file(source, dest)
}

fn record<P: ProgressCallback>(report: &mut SyncReport, progress: &P, action: Action) {
    progress.record(report.push(action));
}

/// PropagationOptions allow the client to customize how files are copied/deleted.
pub trait PropagationOptions {
    /// Delete a single file.
    /// This must return an error if the file was not removed.
    fn remove_file(&self, _: &Path) -> Result<(), SyncError>;

    /// Delete the directory and its contents
    /// This must return an error if the directory was not removed successfully.
    fn remove_dir_all(&self, _: &Path) -> Result<(), SyncError>;

    fn create_dir_all(&self, _: &Path) -> Result<(), SyncError>;

    /// Copy `source` to `dest`, failing if `dest` already exists.
    fn copy_file(&self, source: &Path, dest: &Path) -> Result<(), SyncError>;
}

/// A zero-sized struct with a simple implementation of PropagationOptions.
pub struct DefaultPropagationOptions;

impl PropagationOptions for DefaultPropagationOptions {
    fn remove_file(&self, path: &Path) -> Result<(), SyncError> {
        fs::remove_file(path).describe(|| format!("when removing file {:?}", path))?;
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), SyncError> {
        fs::remove_dir_all(path).describe(|| format!("when removing directory {:?}", path))?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), SyncError> {
        fs::create_dir_all(path).describe(|| format!("when creating directory {:?}", path))?;
        Ok(())
    }

    fn copy_file(&self, source: &Path, dest: &Path) -> Result<(), SyncError> {
        let mut input = File::open(source).describe(|| format!("when opening {:?}", source))?;
        let mut output = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dest)
            .describe(|| format!("when creating {:?}", dest))?;
        io::copy(&mut input, &mut output).describe(|| format!("when writing {:?}", dest))?;
        Ok(())
    }
}
