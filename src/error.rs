use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::Error as WalkDirError;

#[derive(Debug)]
pub enum SyncError {
    IoError(io::Error),
    /// An io error together with a description of what was being attempted.
    DescribedIoError(String, io::Error),
    /// A file could not be read while comparing contents.
    UnreadableFile(PathBuf, io::Error),
    RootDoesntExist(PathBuf),
    NotADirectory(PathBuf),
    /// The sync interval must be at least one second.
    InvalidInterval(u64),
    WalkDirError(WalkDirError),
}

impl SyncError {
    /// The file an `UnreadableFile` error is about.
    pub fn unreadable_path(&self) -> Option<&Path> {
        match *self {
            SyncError::UnreadableFile(ref path, _) => Some(path),
            _ => None,
        }
    }

    /// The underlying io error, if there is one.
    pub fn io_error(&self) -> Option<&io::Error> {
        match *self {
            SyncError::IoError(ref e)
            | SyncError::DescribedIoError(_, ref e)
            | SyncError::UnreadableFile(_, ref e) => Some(e),
            SyncError::WalkDirError(ref e) => e.io_error(),
            _ => None,
        }
    }

    /// True when the operation failed because the destination is already there.
    pub fn is_already_exists(&self) -> bool {
        self.io_error()
            .map(|e| e.kind() == io::ErrorKind::AlreadyExists)
            .unwrap_or(false)
    }
}

impl From<io::Error> for SyncError {
    fn from(e: io::Error) -> Self {
        SyncError::IoError(e)
    }
}

impl From<WalkDirError> for SyncError {
    fn from(e: WalkDirError) -> Self {
        SyncError::WalkDirError(e)
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SyncError::IoError(ref io) => write!(f, "io error: {}", io),
            SyncError::DescribedIoError(ref description, ref io) => {
                write!(f, "io error {}: {}", description, io)
            }
            SyncError::UnreadableFile(ref path, ref io) => write!(f, "cannot read {:?}: {}", path, io),
            SyncError::RootDoesntExist(ref root) => write!(f, "root does not exist: {:?}", root),
            SyncError::NotADirectory(ref path) => write!(f, "{:?} is not a directory", path),
            SyncError::InvalidInterval(secs) => {
                write!(f, "invalid sync interval: {} seconds", secs)
            }
            SyncError::WalkDirError(ref e) => write!(f, "walk dir error: {}", e),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            SyncError::IoError(ref e)
            | SyncError::DescribedIoError(_, ref e)
            | SyncError::UnreadableFile(_, ref e) => Some(e),
            SyncError::WalkDirError(ref e) => Some(e),
            _ => None,
        }
    }
}

/// Attaches a lazily built description to io errors.
pub trait DescribeIoError<T> {
    fn describe<F: FnOnce() -> String>(self, f: F) -> Result<T, SyncError>;
}

impl<T> DescribeIoError<T> for Result<T, io::Error> {
    fn describe<F: FnOnce() -> String>(self, f: F) -> Result<T, SyncError> {
        self.map_err(|e| SyncError::DescribedIoError(f(), e))
    }
}
