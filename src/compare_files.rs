use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::SyncError;

/// A SHA-256 digest of a file's contents.
pub type FileDigest = [u8; 32];

/// Decides whether two files hold the same bytes by comparing content digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentComparer {
    /// Short-circuit on a size mismatch before hashing anything.
    pub quick_check: bool,
}

impl ContentComparer {
    pub fn new(quick_check: bool) -> Self {
        ContentComparer { quick_check }
    }

    /// Returns true iff the digests of `a` and `b` match.
    ///
    /// Both files are read in full unless `quick_check` is set and their sizes differ.
    /// Errors are `SyncError::UnreadableFile` naming the file which could not be read;
    /// `a` is always read first.
    pub fn are_equal(&self, a: &Path, b: &Path) -> Result<bool, SyncError> {
        debug!("Comparing {:?} with {:?}", a, b);

        if self.quick_check {
            let size_a = file_size(a)?;
            let size_b = file_size(b)?;
            if size_a != size_b {
                trace!("File sizes not equal: {} != {}", size_a, size_b);
                return Ok(false);
            }
        }

        Ok(file_digest(a)? == file_digest(b)?)
    }
}

fn file_size(path: &Path) -> Result<u64, SyncError> {
    path.metadata()
        .map(|metadata| metadata.len())
        .map_err(|e| SyncError::UnreadableFile(path.to_path_buf(), e))
}

/// Hashes the whole byte stream of the file at `path`.
pub fn file_digest(path: &Path) -> Result<FileDigest, SyncError> {
    let unreadable = |e| SyncError::UnreadableFile(path.to_path_buf(), e);
    let mut file = File::open(path).map_err(unreadable)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(unreadable)?;
    let mut digest = FileDigest::default();
    digest.copy_from_slice(&hasher.finalize());
    Ok(digest)
}
