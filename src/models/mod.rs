//! Data models for topic annotation.
//!
//! Records come from an upstream scoring pipeline as JSON Lines; outcomes
//! are what the annotation sessions hand to downstream mergers.

mod annotation;
mod record;

pub use annotation::{AnnotatedHardNegatives, AnnotationOutcome};
pub use record::{Candidate, CandidateRecord, HardNegative, HardNegativeKind, RecordStatus};
