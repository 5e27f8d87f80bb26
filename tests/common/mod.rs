//! Helpers shared by the session tests.

use topic_annotator::error::{SessionError, SessionResult};
use topic_annotator::terminal::{MemorySurface, Style, Surface};

/// A surface that reports one overflow the first time `trigger` is written.
///
/// Lets a test force a single mid-record restart on a screen that is
/// otherwise large enough.
pub struct OverflowOnce {
    pub inner: MemorySurface,
    trigger: &'static str,
    tripped: bool,
}

impl OverflowOnce {
    pub fn new(inner: MemorySurface, trigger: &'static str) -> Self {
        Self {
            inner,
            trigger,
            tripped: false,
        }
    }

    pub fn tripped(&self) -> bool {
        self.tripped
    }
}

impl Surface for OverflowOnce {
    fn size(&self) -> (u16, u16) {
        self.inner.size()
    }

    fn cursor_position(&self) -> (u16, u16) {
        self.inner.cursor_position()
    }

    fn put(&mut self, text: &str, style: Style) -> SessionResult<()> {
        if !self.tripped && text.contains(self.trigger) {
            self.tripped = true;
            return Err(SessionError::Overflow);
        }
        self.inner.put(text, style)
    }

    fn move_to(&mut self, row: u16, col: u16) -> SessionResult<()> {
        self.inner.move_to(row, col)
    }

    fn clear(&mut self) -> SessionResult<()> {
        self.inner.clear()
    }
}

/// `lines` short lines of filler text.
pub fn tall_text(lines: usize) -> String {
    (1..=lines)
        .map(|n| format!("Line {} of a very long text.", n))
        .collect::<Vec<_>>()
        .join("\n")
}
