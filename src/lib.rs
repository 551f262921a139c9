//! One-way mirroring of a source directory tree onto a replica tree.
//!
//! Each cycle compares both trees by name and content, deletes replica entries that have no
//! matching source entry, then copies the source tree across.

#[macro_use]
extern crate log;

pub mod compare_files;
pub mod config;
pub mod cycle;
pub mod detect;
pub mod error;
pub mod propagate;
pub mod report;
pub mod schedule;

pub use crate::config::{CopyPolicy, SyncInfo};
pub use crate::cycle::run_cycle;
pub use crate::error::SyncError;
pub use crate::report::SyncReport;
