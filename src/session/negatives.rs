//! Session driver of the hard-negative annotator.

use crate::error::SessionResult;
use crate::models::{AnnotatedHardNegatives, AnnotationOutcome};
use crate::repository::{AnnotatedRepository, AnnotationStore};
use crate::terminal::{KeySource, Surface};

use super::hard_negative_review::HARD_NEGATIVE_CONTROLS;
use super::{
    draw_job_done, introduce, with_overflow_retry, HardNegativeReview, Introduction, RecordScreen,
    ReviewOutcome, SessionStats, Ui,
};

const INSTRUCTIONS: &[&str] = &[
    "You will be presented with texts and potential hard negatives for each text.",
    "Hard negatives from the dataset are marked with 'D', generated hard negatives with 'G' \
     and rejected topics with 'R'.",
    "For each potential hard negative, you will be prompted to mark it as good or not.",
    "Press y/Y if the topic is a good hard negative, n/N if it is not.",
    "You can also skip a text anytime by pressing 's'.",
    "Your annotations will be saved after each text.",
];

/// Whether an entry still waits for hard-negative annotation.
pub fn needs_annotation(outcome: &AnnotationOutcome) -> bool {
    !outcome.skipped
        && !outcome.potential_hard_negatives.is_empty()
        && !outcome.hard_negatives_annotated()
}

/// Walks the annotation store and collects hard-negative verdicts.
#[derive(Debug)]
pub struct HardNegativeAnnotator {
    store: AnnotationStore,
    output: AnnotatedRepository,
    retry_attempts: u32,
}

impl HardNegativeAnnotator {
    pub fn new(store: AnnotationStore, output: AnnotatedRepository, retry_attempts: u32) -> Self {
        Self {
            store,
            output,
            retry_attempts,
        }
    }

    pub fn output(&self) -> &AnnotatedRepository {
        &self.output
    }

    fn persist(&self) -> SessionResult<()> {
        self.store.save()?;
        self.output.save()?;
        Ok(())
    }

    pub fn run<S: Surface, K: KeySource>(&mut self, ui: &mut Ui<S, K>) -> SessionResult<SessionStats> {
        let pending: Vec<String> = self
            .store
            .outcomes()
            .filter(|outcome| needs_annotation(outcome))
            .map(|outcome| outcome.text_id.clone())
            .collect();
        let annotated = self
            .store
            .outcomes()
            .filter(|outcome| outcome.hard_negatives_annotated() || outcome.skipped)
            .count();
        let mut stats = SessionStats {
            remaining: pending.len(),
            ..SessionStats::default()
        };

        let intro = Introduction {
            title: "Welcome to the hard negative annotator!",
            statistics: vec![
                ("Number of texts", self.store.len()),
                ("Number of annotated texts", annotated),
                ("Number of texts left", pending.len()),
            ],
            instructions: INSTRUCTIONS,
            start_hint: "If you want to start annotating, press 'c' or 'q' to quit.",
        };
        if !introduce(ui, &intro, self.retry_attempts)? {
            stats.quit = true;
            return Ok(stats);
        }

        for text_id in pending {
            let Some(entry) = self.store.get(&text_id).cloned() else {
                continue;
            };

            let screen = RecordScreen {
                activity: "annotated",
                controls: HARD_NEGATIVE_CONTROLS,
                text: &entry.text,
                remaining: stats.remaining,
                done_this_session: stats.completed,
                warning: None,
            };
            let outcome = with_overflow_retry(ui, self.retry_attempts, |ui| {
                HardNegativeReview::new(&entry.topics, &entry.potential_hard_negatives)
                    .run(ui, &screen)
            })?;

            match outcome {
                ReviewOutcome::Committed(annotated) => {
                    if let Some(stored) = self.store.get_mut(&text_id) {
                        stored.potential_hard_negatives = annotated;
                        self.output.upsert(AnnotatedHardNegatives::from_outcome(stored));
                    }
                    stats.completed += 1;
                }
                ReviewOutcome::Skipped => {
                    if let Some(stored) = self.store.get_mut(&text_id) {
                        stored.skipped = true;
                    }
                    stats.skipped += 1;
                }
                ReviewOutcome::Quit => {
                    self.persist()?;
                    tracing::info!("Hard-negative session quit");
                    stats.quit = true;
                    return Ok(stats);
                }
            }
            self.persist()?;
            stats.remaining -= 1;
        }

        with_overflow_retry(ui, self.retry_attempts, |ui| {
            draw_job_done(&mut ui.surface, stats.completed)?;
            ui.wait_any_key()
        })?;
        tracing::info!("Hard-negative session finished, {} texts annotated", stats.completed);
        Ok(stats)
    }
}
