//! Batch operations over the annotation files.
//!
//! These run outside the interactive sessions and report progress through
//! events so the CLI decides how to display it.

pub mod merge;
pub mod status;

pub use merge::{DatasetNegatives, MergeEvent, MergeOptions, MergeResult, MergeService};
pub use status::StatusReport;
