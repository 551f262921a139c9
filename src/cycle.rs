use fnv::FnvHashSet;

use crate::compare_files::ContentComparer;
use crate::config::{CopyPolicy, SyncInfo};
use crate::detect::find_deletions;
use crate::propagate::{self, ProgressCallback, PropagationOptions};
use crate::report::{Action, SyncReport};

/// Runs one full mirroring pass of `info.source` onto `info.replica`.
///
/// The order is fixed: compare, delete files, delete folders, copy. A fault on one entry is
/// recorded and never stops the others. If either root cannot be listed, nothing is deleted
/// this cycle but the copy phase still runs, since it never overwrites anything.
pub fn run_cycle<T, P>(info: &SyncInfo, options: &T, progress: &P) -> SyncReport
where
    T: PropagationOptions,
    P: ProgressCallback,
{
    let mut report = SyncReport::new();
    progress.record(report.push(Action::CycleStarted));
    info!("Syncing {:?} to {:?}", info.source, info.replica);

    let comparer = ContentComparer::new(info.quick_check);

    let mut unchanged = FnvHashSet::default();
    match find_deletions(&info.replica, &info.source, &comparer) {
        Ok(mut deletions) => {
            for fault in deletions.take_faults() {
                let action = Action::CompareFailed { path: fault.path, error: fault.error, marked: fault.marked };
                progress.record(report.push(action));
            }
            debug!(
                "{} file(s) and {} folder(s) to delete",
                deletions.files().len(),
                deletions.directories().len()
            );
            propagate::delete_files(deletions.files(), options, &mut report, progress);
            propagate::delete_folders(deletions.directories(), options, &mut report, progress);

            if info.copy_policy == CopyPolicy::SkipUnchanged {
                unchanged.extend(deletions.unchanged_files().cloned());
            }
        }
        Err(e) => {
            error!("Comparison failed, skipping deletions: {}", e);
            progress.record(report.push(Action::ComparisonFailed(e)));
        }
    }

    propagate::copy_all(&info.source, &info.replica, &unchanged, options, &mut report, progress);

    info!("Cycle finished with {} failure(s)", report.failures());
    report
}
