//! In-memory surface and scripted keys for headless sessions.

use std::collections::VecDeque;

use crate::error::{SessionError, SessionResult};

use super::{KeySource, Style, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    bold: bool,
}

const BLANK: Cell = Cell {
    ch: ' ',
    bold: false,
};

/// A fixed-size grid that records what would be shown on screen.
///
/// Everything ever written is also kept in a transcript that survives
/// `clear()`.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    width: u16,
    height: u16,
    row: u16,
    col: u16,
    cells: Vec<Vec<Cell>>,
    transcript: String,
    clears: usize,
}

impl MemorySurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            row: 0,
            col: 0,
            cells: vec![vec![BLANK; usize::from(width)]; usize::from(height)],
            transcript: String::new(),
            clears: 0,
        }
    }

    /// Text of one row with trailing blanks removed.
    pub fn row_text(&self, row: u16) -> String {
        self.cells
            .get(usize::from(row))
            .map(|cells| cells.iter().map(|c| c.ch).collect::<String>())
            .unwrap_or_default()
            .trim_end()
            .to_string()
    }

    /// Visible screen, one line per row.
    pub fn screen(&self) -> String {
        (0..self.height)
            .map(|row| self.row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_bold(&self, row: u16, col: u16) -> bool {
        self.cells
            .get(usize::from(row))
            .and_then(|cells| cells.get(usize::from(col)))
            .is_some_and(|c| c.bold)
    }

    /// All text written since creation, across clears.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// How many times the surface was cleared.
    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl Surface for MemorySurface {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn cursor_position(&self) -> (u16, u16) {
        (self.row, self.col)
    }

    fn put(&mut self, text: &str, style: Style) -> SessionResult<()> {
        let row = self
            .cells
            .get_mut(usize::from(self.row))
            .ok_or(SessionError::Overflow)?;
        for ch in text.chars() {
            if let Some(cell) = row.get_mut(usize::from(self.col)) {
                *cell = Cell {
                    ch,
                    bold: style == Style::Bold,
                };
            }
            self.col = self.col.saturating_add(1);
        }
        self.transcript.push_str(text);
        Ok(())
    }

    fn move_to(&mut self, row: u16, col: u16) -> SessionResult<()> {
        if row >= self.height {
            return Err(SessionError::Overflow);
        }
        if row > self.row {
            self.transcript.push('\n');
        }
        self.row = row;
        self.col = col;
        Ok(())
    }

    fn clear(&mut self) -> SessionResult<()> {
        for row in &mut self.cells {
            row.fill(BLANK);
        }
        self.row = 0;
        self.col = 0;
        self.clears += 1;
        self.transcript.push('\n');
        Ok(())
    }
}

/// Key presses replayed from a fixed script.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<char>,
}

impl ScriptedKeys {
    pub fn new(keys: &str) -> Self {
        Self {
            keys: keys.chars().collect(),
        }
    }

    /// Keys not consumed yet.
    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> SessionResult<char> {
        self.keys.pop_front().ok_or(SessionError::InputClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_grid_but_keeps_transcript() {
        let mut surface = MemorySurface::new(10, 2);
        surface.plain("hello").unwrap();
        surface.clear().unwrap();

        assert_eq!(surface.row_text(0), "");
        assert_eq!(surface.cursor_position(), (0, 0));
        assert!(surface.transcript().contains("hello"));
        assert_eq!(surface.clear_count(), 1);
    }

    #[test]
    fn test_scripted_keys_run_out() {
        let mut keys = ScriptedKeys::new("ab");
        assert_eq!(keys.next_key().unwrap(), 'a');
        assert_eq!(keys.next_key().unwrap(), 'b');
        assert!(matches!(keys.next_key(), Err(SessionError::InputClosed)));
    }
}
