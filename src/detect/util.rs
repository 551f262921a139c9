use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use fnv::FnvHashMap;

use crate::error::{DescribeIoError, SyncError};

pub fn check_all_roots_exist<'a, I: Iterator<Item = &'a PathBuf>>(roots: I) -> Result<(), SyncError> {
    for root in roots {
        if !root.exists() {
            return Err(SyncError::RootDoesntExist(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(SyncError::NotADirectory(root.to_path_buf()));
        }
    }
    Ok(())
}

/// The immediate children of a directory, split by kind and sorted by name.
#[derive(Debug, Default)]
pub struct DirectoryListing {
    pub files: Vec<PathBuf>,
    pub directories: Vec<PathBuf>,
}

/// Reads the direct children of `directory`. Symlinks are classified by their target;
/// dangling links count as files.
pub fn list_directory(directory: &Path) -> Result<DirectoryListing, SyncError> {
    let mut listing = DirectoryListing::default();

    for item in fs::read_dir(directory).describe(|| format!("listing {:?}", directory))? {
        let item = item.describe(|| format!("listing {:?}", directory))?;
        let path = item.path();
        let mut ty = item.file_type().describe(|| format!("reading file type of {:?}", path))?;
        if ty.is_symlink() {
            match fs::metadata(&path) {
                Ok(target) => ty = target.file_type(),
                Err(_) => {
                    warn!("Dangling symlink {:?}", path);
                    listing.files.push(path);
                    continue;
                }
            }
        }

        trace!("Adding entry {:?}", path);
        if ty.is_dir() {
            listing.directories.push(path);
        } else {
            listing.files.push(path);
        }
    }

    listing.files.sort();
    listing.directories.sort();
    Ok(listing)
}

/// Indexes paths by their base name. Names compare exactly, byte for byte.
pub fn index_by_name(paths: &[PathBuf]) -> FnvHashMap<&OsStr, &Path> {
    paths
        .iter()
        .filter_map(|path| path.file_name().map(|name| (name, path.as_path())))
        .collect()
}
