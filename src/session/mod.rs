//! Interactive annotation sessions.
//!
//! A session is layered as surface (rendering), [`Ui`] (allow-listed key
//! prompts) and a per-record review machine. The drivers in [`cleaner`] and
//! [`negatives`] walk the pending records and persist after each one.

pub mod cleaner;
mod hard_negative_review;
pub mod negatives;
mod prompts;
mod retry;
mod screen;
mod topic_review;

pub use cleaner::DatasetCleaner;
pub use hard_negative_review::HardNegativeReview;
pub use negatives::HardNegativeAnnotator;
pub use prompts::{MenuChoice, StartChoice, Ui};
pub use retry::{with_overflow_retry, DEFAULT_RETRY_ATTEMPTS};
pub use screen::{draw_job_done, Introduction, RecordScreen};
pub use topic_review::TopicReview;

use crate::error::{SessionError, SessionResult};
use crate::terminal::{KeySource, Surface};

/// How a single record review ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome<T> {
    Committed(T),
    Skipped,
    Quit,
}

impl<T> ReviewOutcome<T> {
    /// Fold the skip and quit signals of a review step into an outcome.
    pub(crate) fn from_step(step: SessionResult<T>) -> SessionResult<Self> {
        match step {
            Ok(value) => Ok(Self::Committed(value)),
            Err(SessionError::Skip) => Ok(Self::Skipped),
            Err(SessionError::Quit) => Ok(Self::Quit),
            Err(e) => Err(e),
        }
    }
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub completed: usize,
    pub skipped: usize,
    pub remaining: usize,
    pub quit: bool,
}

/// Show an introduction and wait for the annotator to start or quit.
///
/// Returns `false` when a quit was confirmed.
pub(crate) fn introduce<S, K>(
    ui: &mut Ui<S, K>,
    intro: &Introduction<'_>,
    attempts: u32,
) -> SessionResult<bool>
where
    S: Surface,
    K: KeySource,
{
    with_overflow_retry(ui, attempts, |ui| {
        intro.draw(&mut ui.surface)?;
        loop {
            match ui.quit_or_proceed()? {
                StartChoice::Proceed => return Ok(true),
                StartChoice::Quit => return Ok(false),
                StartChoice::Reconsider => {
                    ui.surface.plain("\n")?;
                    ui.surface.plain(intro.start_hint)?;
                }
            }
        }
    })
}
