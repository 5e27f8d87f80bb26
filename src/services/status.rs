//! Progress summary over the record stream and the annotation store.

use crate::models::RecordStatus;
use crate::repository::{AnnotationStore, RecordStream};
use crate::session::negatives::needs_annotation;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub total_records: usize,
    pub not_visited: usize,
    pub skipped: usize,
    pub checked: usize,
    /// Checked records whose outcome is missing from the store.
    pub missing_outcomes: Vec<String>,
    pub stored_outcomes: usize,
    pub hard_negatives_pending: usize,
    pub hard_negatives_annotated: usize,
    pub hard_negatives_skipped: usize,
}

impl StatusReport {
    pub fn collect(records: &RecordStream, store: &AnnotationStore) -> Self {
        let missing_outcomes = records
            .records()
            .iter()
            .filter(|r| r.status == RecordStatus::Checked && !store.contains(&r.id))
            .map(|r| r.id.clone())
            .collect();

        let mut report = Self {
            total_records: records.len(),
            not_visited: records.count_status(RecordStatus::NotVisited),
            skipped: records.count_status(RecordStatus::Skipped),
            checked: records.count_status(RecordStatus::Checked),
            missing_outcomes,
            stored_outcomes: store.len(),
            ..Self::default()
        };

        for outcome in store.outcomes() {
            if outcome.skipped {
                report.hard_negatives_skipped += 1;
            } else if outcome.hard_negatives_annotated() {
                report.hard_negatives_annotated += 1;
            } else if needs_annotation(outcome) {
                report.hard_negatives_pending += 1;
            }
        }
        report
    }
}
