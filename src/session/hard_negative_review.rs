//! Per-text review of hard-negative candidates.

use crate::error::SessionResult;
use crate::models::HardNegative;
use crate::terminal::{KeySource, Surface};

use super::{MenuChoice, RecordScreen, ReviewOutcome, Ui};

pub const HARD_NEGATIVE_CONTROLS: &str = "Press y/Y if the topic is a good hard negative, \
n/N if it is not.\nYou can also skip this text anytime by pressing 's'.\n";

const REDO_MENU: &str =
    "\n\nPress 'c' to continue, 'r' to redo if you made a mistake, 'q' to quit. ";
const TOGGLE_INDEX: &str = "\nToggle annotation result by pressing the number of the annotation: ";
const INVALID_INDEX: &str = "Invalid annotation number.\n";

/// Verdicts for one text's hard-negative candidates.
#[derive(Debug, Clone)]
pub struct HardNegativeReview<'a> {
    topics: &'a [String],
    candidates: &'a [HardNegative],
    annotated: Vec<HardNegative>,
}

impl<'a> HardNegativeReview<'a> {
    pub fn new(topics: &'a [String], candidates: &'a [HardNegative]) -> Self {
        Self {
            topics,
            candidates,
            annotated: Vec::with_capacity(candidates.len()),
        }
    }

    /// Ask for every candidate, then offer toggling until committed.
    ///
    /// A committed outcome carries every candidate with its verdict set.
    pub fn run<S: Surface, K: KeySource>(
        &mut self,
        ui: &mut Ui<S, K>,
        screen: &RecordScreen<'_>,
    ) -> SessionResult<ReviewOutcome<Vec<HardNegative>>> {
        self.annotated.clear();
        ReviewOutcome::from_step(self.review(ui, screen))
    }

    fn review<S: Surface, K: KeySource>(
        &mut self,
        ui: &mut Ui<S, K>,
        screen: &RecordScreen<'_>,
    ) -> SessionResult<Vec<HardNegative>> {
        self.redraw(ui, screen)?;

        for candidate in self.candidates {
            ui.surface.plain(&format!("{} \n", candidate.topic))?;
            let verdict = ui.accept_or_reject("Good hard negative? [Y/n] ")?;
            self.annotated.push(HardNegative {
                annotation: Some(verdict),
                ..candidate.clone()
            });
            self.redraw(ui, screen)?;
        }

        loop {
            ui.surface.plain(REDO_MENU)?;
            match ui.redo_or_proceed()? {
                MenuChoice::Continue => return Ok(self.annotated.clone()),
                MenuChoice::Reconsider => {}
                MenuChoice::Redo => {
                    ui.surface.plain(TOGGLE_INDEX)?;
                    match ui.read_index(self.annotated.len())? {
                        Some(index) => {
                            let entry = &mut self.annotated[index];
                            entry.annotation = Some(!entry.annotation.unwrap_or(false));
                            self.redraw(ui, screen)?;
                            ui.surface.plain(&format!("\nAnnotation #{} toggled.", index + 1))?;
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

        if !self.topics.is_empty() {
            ui.surface.bold("Correct topics:\n")?;
        }
        for topic in self.topics {
            ui.surface.plain(&format!("{}\n", topic))?;
        }

        ui.surface.bold("\nHard negatives:\n")?;
        for (n, hn) in self.annotated.iter().enumerate() {
            let mark = if hn.annotation == Some(true) { "✓" } else { "✗" };
            ui.surface.plain(&format!(
                "{} #{} {}: {}\n",
                mark,
                n + 1,
                hn.kind.shortcut(),
                hn.topic
            ))?;
        }
        Ok(())
    }
}
