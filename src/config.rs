use std::path::PathBuf;

/// How the copy phase treats source files that are already present in the replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPolicy {
    /// Copy every source file on every cycle. Files which survived the deletion phase
    /// are already in place, so these copies fail with a destination-exists error
    /// and get recorded as failures.
    AttemptAll,
    /// Skip source files whose replica counterpart exists and is content-equal.
    SkipUnchanged,
}

impl Default for CopyPolicy {
    fn default() -> Self {
        CopyPolicy::AttemptAll
    }
}

/// The configuration for a single mirroring pair.
#[derive(Debug, Clone)]
pub struct SyncInfo {
    /// The authoritative tree.
    pub source: PathBuf,
    /// The tree which is kept identical to `source`.
    pub replica: PathBuf,
    pub copy_policy: CopyPolicy,
    /// Treat files of different sizes as different without hashing them.
    pub quick_check: bool,
}

impl SyncInfo {
    pub fn new<S: Into<PathBuf>, R: Into<PathBuf>>(source: S, replica: R) -> Self {
        SyncInfo {
            source: source.into(),
            replica: replica.into(),
            copy_policy: CopyPolicy::default(),
            quick_check: false,
        }
    }

    pub fn roots(&self) -> [&PathBuf; 2] {
        [&self.source, &self.replica]
    }
}
