//! Error and signal types of the annotation sessions.

use thiserror::Error;

use crate::repository::RepositoryError;

/// Everything that can interrupt a session step.
///
/// `Skip` and `Quit` are annotator decisions, not failures: they travel
/// through `?` like errors and are turned into a session outcome at the
/// state-machine boundary.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The annotator confirmed skipping the current text.
    #[error("Text skipped by the annotator")]
    Skip,

    /// The annotator confirmed quitting the session.
    #[error("Session quit by the annotator")]
    Quit,

    /// Content would need a row below the visible area.
    #[error("Terminal window is full")]
    Overflow,

    /// Overflow kept recurring after every retry.
    #[error(
        "Terminal too small to display the text after {attempts} attempts. \
         Try increasing the terminal size."
    )]
    SurfaceTooSmall { attempts: u32 },

    #[error("Terminal is {width}x{height}, at least {min_width}x{min_height} is required")]
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },

    #[error("Standard output is not an interactive terminal")]
    NotATerminal,

    /// The key source has no more input.
    #[error("Input closed")]
    InputClosed,

    #[error("Terminal IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type SessionResult<T> = Result<T, SessionError>;
