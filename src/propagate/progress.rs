use crate::report::Record;

/// Receives each report record as soon as it is produced.
pub trait ProgressCallback {
    fn record(&self, record: &Record);
}

/// A zero-sized struct with an empty implementation of ProgressCallback
pub struct EmptyProgressCallback;

impl ProgressCallback for EmptyProgressCallback {
    fn record(&self, _: &Record) {}
}

/// Mirrors every record to stdout.
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn record(&self, record: &Record) {
        println!("{}", record);
    }
}
