//! Per-record topic review of the dataset cleaner.

use crate::error::SessionResult;
use crate::models::Candidate;
use crate::terminal::{KeySource, Surface};

use super::{MenuChoice, RecordScreen, ReviewOutcome, Ui};

pub const CLEANER_CONTROLS: &str = "Press y/Y if the topic is relevant, n/N if it is not. \
You can also skip this text anytime by pressing 's'.\nYou will also be able to redo the \
current text after the last topic if you make a mistake during cleaning.\n";

const REDO_MENU: &str =
    "\n\nIf you want to continue, press 'c', to redo an annotation press 'r', to quit press 'q'. ";
const REDO_INDEX: &str =
    "Choose which annotation to redo by pressing the number of the annotation: ";
const INVALID_INDEX: &str = "Invalid annotation number.\n";

/// Review state for one record's candidates.
///
/// Candidates must already be in review order (ascending similarity).
#[derive(Debug, Clone)]
pub struct TopicReview<'a> {
    candidates: &'a [Candidate],
    accepted: Vec<bool>,
    /// Set by the first acceptance; every later candidate is accepted
    /// without asking.
    accepted_topic: bool,
}

impl<'a> TopicReview<'a> {
    pub fn new(candidates: &'a [Candidate]) -> Self {
        Self {
            candidates,
            accepted: vec![false; candidates.len()],
            accepted_topic: false,
        }
    }

    fn reset(&mut self) {
        self.accepted.fill(false);
        self.accepted_topic = false;
    }

    /// Accepted topics in review order without duplicates.
    pub fn correct_topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = Vec::new();
        for (candidate, _) in self
            .candidates
            .iter()
            .zip(&self.accepted)
            .filter(|(_, accepted)| **accepted)
        {
            if !topics.contains(&candidate.topic) {
                topics.push(candidate.topic.clone());
            }
        }
        topics
    }

    /// Review the record from scratch until it is committed, skipped or the
    /// session is quit.
    pub fn run<S: Surface, K: KeySource>(
        &mut self,
        ui: &mut Ui<S, K>,
        screen: &RecordScreen<'_>,
    ) -> SessionResult<ReviewOutcome<Vec<String>>> {
        self.reset();
        ReviewOutcome::from_step(self.review(ui, screen))
    }

    fn review<S: Surface, K: KeySource>(
        &mut self,
        ui: &mut Ui<S, K>,
        screen: &RecordScreen<'_>,
    ) -> SessionResult<Vec<String>> {
        screen.draw(&mut ui.surface)?;

        let candidates = self.candidates;
        for (i, candidate) in candidates.iter().enumerate() {
            if self.accepted_topic {
                self.accepted[i] = true;
                ui.surface.bold(&format!("Accepted topic #{}: ", i + 1))?;
                ui.surface.plain(&format!("{}\n", candidate.topic))?;
                continue;
            }

            ui.surface.plain("\n")?;
            ui.surface.bold(&format!("Topic #{}: ", i + 1))?;
            ui.surface.plain(&format!("{}\n", candidate.topic))?;

            if ui.accept_or_reject("Relevant? [Y/n] ")? {
                self.accepted[i] = true;
                self.accepted_topic = true;
            }
        }

        self.redraw(ui, screen)?;
        self.redo_menu(ui, screen)?;
        Ok(self.correct_topics())
    }

    fn redo_menu<S: Surface, K: KeySource>(
        &mut self,
        ui: &mut Ui<S, K>,
        screen: &RecordScreen<'_>,
    ) -> SessionResult<()> {
        loop {
            ui.surface.plain(REDO_MENU)?;
            match ui.redo_or_proceed()? {
                MenuChoice::Continue => return Ok(()),
                MenuChoice::Reconsider => {}
                MenuChoice::Redo => {
                    ui.surface.plain(REDO_INDEX)?;
                    match ui.read_index(self.candidates.len())? {
                        Some(index) => {
                            self.accepted[index] = ui.relevant()?;
                            self.redraw(ui, screen)?;
                        }
                        None => ui.surface.plain(INVALID_INDEX)?,
                    }
                }
            }
        }
    }

    fn redraw<S: Surface, K: KeySource>(
        &self,
        ui: &mut Ui<S, K>,
        screen: &RecordScreen<'_>,
    ) -> SessionResult<()> {
        screen.draw(&mut ui.surface)?;
        for (i, (candidate, accepted)) in self.candidates.iter().zip(&self.accepted).enumerate() {
            let mark = if *accepted { "✓" } else { "✗" };
            ui.surface.plain(&format!("{} ", mark))?;
            ui.surface.bold(&format!("Topic #{}: ", i + 1))?;
            ui.surface.plain(&format!("{}\n", candidate.topic))?;
        }
        Ok(())
    }
}
