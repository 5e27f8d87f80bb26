//! Session driver of the dataset cleaner.

use crate::error::SessionResult;
use crate::models::{AnnotationOutcome, CandidateRecord, HardNegative, RecordStatus};
use crate::repository::{AnnotationStore, Commit, PersistenceWriter};
use crate::terminal::{KeySource, Surface};

use super::topic_review::CLEANER_CONTROLS;
use super::{
    draw_job_done, introduce, with_overflow_retry, Introduction, RecordScreen, ReviewOutcome,
    SessionStats, TopicReview, Ui,
};

const INSTRUCTIONS: &[&str] = &[
    "You will be presented with texts and potential topics for each text.",
    "The topics are sorted by similarity to the text, with the least similar topic first.",
    "For each topic you will be prompted to mark it as relevant or not.",
    "Press y/Y if the topic is relevant, n/N if it is not.",
    "Once you mark a topic relevant, the rest of the topics will be marked as relevant as well.",
    "After every cleaned text, your progress will be saved.",
];

/// Why a record is offered for cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    Fresh,
    /// Skipped in an earlier session.
    Reopened,
    /// Marked checked, but its outcome is missing from the store.
    MissingOutcome,
}

impl Pending {
    /// Classify a record, or `None` when it needs no cleaning.
    pub fn of(record: &CandidateRecord, store: &AnnotationStore) -> Option<Self> {
        if record.candidates.is_empty() {
            return None;
        }
        match record.status {
            RecordStatus::NotVisited => Some(Self::Fresh),
            RecordStatus::Skipped => Some(Self::Reopened),
            RecordStatus::Checked if !store.contains(&record.id) => Some(Self::MissingOutcome),
            RecordStatus::Checked => None,
        }
    }

    fn warning(&self, text_id: &str) -> Option<String> {
        match self {
            Self::MissingOutcome => Some(format!(
                "Sample {} is marked as checked, but it is not present in the annotation store.",
                text_id
            )),
            _ => None,
        }
    }
}

/// Walks the record stream and cleans every pending record.
#[derive(Debug)]
pub struct DatasetCleaner {
    writer: PersistenceWriter,
    retry_attempts: u32,
}

impl DatasetCleaner {
    pub fn new(writer: PersistenceWriter, retry_attempts: u32) -> Self {
        Self {
            writer,
            retry_attempts,
        }
    }

    /// Indices of the records a session would offer, in file order.
    pub fn pending(&self) -> Vec<(usize, Pending)> {
        self.writer
            .records
            .records()
            .iter()
            .enumerate()
            .filter_map(|(i, record)| Pending::of(record, &self.writer.store).map(|p| (i, p)))
            .collect()
    }

    pub fn run<S: Surface, K: KeySource>(&mut self, ui: &mut Ui<S, K>) -> SessionResult<SessionStats> {
        let pending = self.pending();
        let mut stats = SessionStats {
            remaining: pending.len(),
            ..SessionStats::default()
        };

        let intro = Introduction {
            title: "Welcome to the dataset cleaner!",
            statistics: vec![
                ("Number of texts", self.writer.records.len()),
                ("Number of cleaned texts", self.writer.store.len()),
                ("Number of texts left", pending.len()),
            ],
            instructions: INSTRUCTIONS,
            start_hint: "If you want to start cleaning press 'c', to quit press 'q'.",
        };
        if !introduce(ui, &intro, self.retry_attempts)? {
            tracing::info!("Cleaning session quit before the first text");
            stats.quit = true;
            return Ok(stats);
        }

        for (index, reason) in pending {
            let Some(record) = self.writer.records.get(index).cloned() else {
                continue;
            };
            let warning = reason.warning(&record.id);
            if let Some(warning) = &warning {
                tracing::warn!("{}", warning);
            }

            let sorted = record.sorted_candidates();
            let screen = RecordScreen {
                activity: "cleaned",
                controls: CLEANER_CONTROLS,
                text: &record.text,
                remaining: stats.remaining,
                done_this_session: stats.completed,
                warning: warning.as_deref(),
            };
            let outcome = with_overflow_retry(ui, self.retry_attempts, |ui| {
                TopicReview::new(&sorted).run(ui, &screen)
            })?;

            match outcome {
                ReviewOutcome::Committed(topics) => {
                    let existing = self.existing_hard_negatives(&record);
                    let outcome = AnnotationOutcome::from_review(
                        record.id.clone(),
                        record.text.clone(),
                        &sorted,
                        topics,
                        &existing,
                    );
                    tracing::debug!("Committing {} with topics {:?}", record.id, outcome.topics);
                    self.writer.commit(index, Commit::Checked(outcome))?;
                    stats.completed += 1;
                }
                ReviewOutcome::Skipped => {
                    tracing::debug!("Skipping {}", record.id);
                    self.writer.commit(index, Commit::Skipped)?;
                    stats.skipped += 1;
                }
                ReviewOutcome::Quit => {
                    self.writer.flush()?;
                    tracing::info!(
                        "Cleaning session quit after {} texts",
                        stats.completed + stats.skipped
                    );
                    stats.quit = true;
                    return Ok(stats);
                }
            }
            stats.remaining -= 1;
        }

        with_overflow_retry(ui, self.retry_attempts, |ui| {
            draw_job_done(&mut ui.surface, stats.completed)?;
            ui.wait_any_key()
        })?;
        tracing::info!("Cleaning session finished, {} texts cleaned", stats.completed);
        Ok(stats)
    }

    /// Hard negatives known for a record: the stored outcome's first, then
    /// any merged onto the record itself.
    fn existing_hard_negatives(&self, record: &CandidateRecord) -> Vec<HardNegative> {
        self.writer
            .store
            .get(&record.id)
            .map(|outcome| outcome.potential_hard_negatives.clone())
            .unwrap_or_default()
            .into_iter()
            .chain(record.hard_negatives().iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candidate;

    #[test]
    fn test_pending_classification() {
        let store = AnnotationStore::empty("store.json");
        let mut record = CandidateRecord::new("t1", "x", vec![Candidate::new("A", 0.1)]);
        assert_eq!(Pending::of(&record, &store), Some(Pending::Fresh));

        record.status = RecordStatus::Skipped;
        assert_eq!(Pending::of(&record, &store), Some(Pending::Reopened));

        record.status = RecordStatus::Checked;
        assert_eq!(Pending::of(&record, &store), Some(Pending::MissingOutcome));

        record.candidates.clear();
        record.status = RecordStatus::NotVisited;
        assert_eq!(Pending::of(&record, &store), None);
    }

    #[test]
    fn test_checked_record_in_store_is_done() {
        let mut store = AnnotationStore::empty("store.json");
        store.upsert(AnnotationOutcome::from_review("t1", "x", &[], vec![], &[]));
        let mut record = CandidateRecord::new("t1", "x", vec![Candidate::new("A", 0.1)]);
        record.status = RecordStatus::Checked;
        assert_eq!(Pending::of(&record, &store), None);
    }
}
