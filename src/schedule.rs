use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::config::SyncInfo;
use crate::cycle::run_cycle;
use crate::detect::check_all_roots_exist;
use crate::error::SyncError;
use crate::propagate::{ProgressCallback, PropagationOptions};
use crate::report::SyncReport;

/// Name of the report file written into the log directory.
pub const LOG_FILE_NAME: &str = "log.txt";

/// Drives `run_cycle` at a fixed interval and keeps the latest report on disk.
#[derive(Debug, Clone)]
pub struct Scheduler {
    info: SyncInfo,
    log_path: PathBuf,
    interval: Duration,
}

impl Scheduler {
    /// Fails if either root is missing or `interval_secs` is zero.
    pub fn new(info: SyncInfo, log_dir: &Path, interval_secs: u64) -> Result<Self, SyncError> {
        if interval_secs == 0 {
            return Err(SyncError::InvalidInterval(interval_secs));
        }
        check_all_roots_exist(info.roots().iter().copied())?;
        check_all_roots_exist(std::iter::once(&log_dir.to_path_buf()))?;

        Ok(Scheduler {
            info,
            log_path: log_dir.join(LOG_FILE_NAME),
            interval: Duration::from_secs(interval_secs),
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs a single cycle and overwrites the log file with its report.
    pub fn run_once<T, P>(&self, options: &T, progress: &P) -> SyncReport
    where
        T: PropagationOptions,
        P: ProgressCallback,
    {
        let report = run_cycle(&self.info, options, progress);

        let existed = self.log_path.exists();
        match report.write_to(&self.log_path) {
            Ok(()) if existed => info!("Previous log file {:?} overwritten", self.log_path),
            Ok(()) => info!("New log file {:?} created", self.log_path),
            Err(e) => error!("{}", e),
        }
        report
    }

    /// Runs cycles forever. The full interval is slept after each cycle, so a slow
    /// cycle pushes back the next one.
    pub fn run<T, P>(&self, options: &T, progress: &P) -> !
    where
        T: PropagationOptions,
        P: ProgressCallback,
    {
        loop {
            self.run_once(options, progress);
            debug!("Sleeping for {:?}", self.interval);
            thread::sleep(self.interval);
        }
    }
}
