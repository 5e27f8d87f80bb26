//! Render surface contract and word wrapping.

use console::measure_text_width;

use crate::error::{SessionError, SessionResult};

/// Text attributes supported by the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Style {
    #[default]
    Plain,
    Bold,
}

/// A bounded character grid with a cursor.
///
/// Implementors provide the raw primitives; [`Surface::write`] layers line
/// breaks and word wrapping on top and reports [`SessionError::Overflow`]
/// when the content does not fit below the cursor.
pub trait Surface {
    /// Visible `(width, height)` in cells.
    fn size(&self) -> (u16, u16);

    /// Current `(row, col)` of the cursor.
    fn cursor_position(&self) -> (u16, u16);

    /// Put `text` at the cursor and advance it. The caller guarantees the
    /// text fits on the current row.
    fn put(&mut self, text: &str, style: Style) -> SessionResult<()>;

    /// Move the cursor to `(row, col)`.
    fn move_to(&mut self, row: u16, col: u16) -> SessionResult<()>;

    /// Erase everything and move the cursor to the origin.
    fn clear(&mut self) -> SessionResult<()>;

    /// Make pending output visible.
    fn flush(&mut self) -> SessionResult<()> {
        Ok(())
    }

    /// Append `text` at the cursor, wrapping on word boundaries.
    fn write(&mut self, text: &str, style: Style) -> SessionResult<()> {
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                new_line(self)?;
            }
            write_line(self, line, style)?;
        }
        Ok(())
    }

    /// Shorthand for a plain write.
    fn plain(&mut self, text: &str) -> SessionResult<()> {
        self.write(text, Style::Plain)
    }

    /// Shorthand for a bold write.
    fn bold(&mut self, text: &str) -> SessionResult<()> {
        self.write(text, Style::Bold)
    }
}

fn new_line<S: Surface + ?Sized>(surface: &mut S) -> SessionResult<()> {
    let (_, height) = surface.size();
    let (row, _) = surface.cursor_position();
    if row + 1 >= height {
        return Err(SessionError::Overflow);
    }
    surface.move_to(row + 1, 0)
}

fn write_line<S: Surface + ?Sized>(surface: &mut S, line: &str, style: Style) -> SessionResult<()> {
    if line.is_empty() {
        return Ok(());
    }
    let width = usize::from(surface.size().0);
    let (_, col) = surface.cursor_position();

    if usize::from(col) + measure_text_width(line) <= width {
        return surface.put(line, style);
    }

    for token in words_and_spaces(line) {
        let token_width = measure_text_width(token);
        let (_, col) = surface.cursor_position();
        if usize::from(col) + token_width <= width {
            surface.put(token, style)?;
            continue;
        }

        let blank = token.trim().is_empty();
        if !blank && token_width > width {
            // Wider than a whole row, nothing else can make it fit
            if col > 0 {
                new_line(surface)?;
            }
            put_hard_wrapped(surface, token, style, width)?;
            continue;
        }

        new_line(surface)?;
        if !blank {
            surface.put(token, style)?;
        }
    }
    Ok(())
}

fn put_hard_wrapped<S: Surface + ?Sized>(
    surface: &mut S,
    token: &str,
    style: Style,
    width: usize,
) -> SessionResult<()> {
    let mut chunk = String::new();
    for ch in token.chars() {
        let mut extended = chunk.clone();
        extended.push(ch);
        if !chunk.is_empty() && measure_text_width(&extended) > width {
            surface.put(&chunk, style)?;
            new_line(surface)?;
            chunk = ch.to_string();
        } else {
            chunk = extended;
        }
    }
    if !chunk.is_empty() {
        surface.put(&chunk, style)?;
    }
    Ok(())
}

/// Split a line into alternating word and single-space tokens.
///
/// `"spam eggs"` becomes `["spam", " ", "eggs"]`; runs of spaces yield
/// empty words between them, which write as nothing.
pub fn words_and_spaces(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for (idx, word) in line.split(' ').enumerate() {
        if idx > 0 {
            tokens.push(" ");
        }
        if !word.is_empty() {
            tokens.push(word);
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::MemorySurface;

    #[test]
    fn test_words_and_spaces() {
        assert_eq!(
            words_and_spaces("spam eggs ham"),
            vec!["spam", " ", "eggs", " ", "ham"]
        );
        assert_eq!(words_and_spaces("a  b"), vec!["a", " ", " ", "b"]);
        assert!(words_and_spaces("").is_empty());
    }

    #[test]
    fn test_short_line_written_at_once() {
        let mut surface = MemorySurface::new(20, 3);
        surface.plain("hello world").unwrap();
        assert_eq!(surface.row_text(0), "hello world");
        assert_eq!(surface.cursor_position(), (0, 11));
    }

    #[test]
    fn test_wraps_on_word_boundary() {
        let mut surface = MemorySurface::new(10, 3);
        surface.plain("alpha beta gamma").unwrap();
        assert_eq!(surface.row_text(0), "alpha beta");
        assert_eq!(surface.row_text(1), "gamma");
    }

    #[test]
    fn test_never_splits_words_that_fit_a_row() {
        let mut surface = MemorySurface::new(8, 4);
        surface.plain("one three seven").unwrap();
        for row in 0..3 {
            let text = surface.row_text(row);
            for word in text.split_whitespace() {
                assert!(["one", "three", "seven"].contains(&word), "split: {}", word);
            }
        }
    }

    #[test]
    fn test_newline_moves_to_next_row() {
        let mut surface = MemorySurface::new(10, 3);
        surface.plain("a\nb").unwrap();
        assert_eq!(surface.row_text(0), "a");
        assert_eq!(surface.row_text(1), "b");
    }

    #[test]
    fn test_overflow_when_out_of_rows() {
        let mut surface = MemorySurface::new(5, 2);
        let err = surface.plain("aaaa bbbb cccc").unwrap_err();
        assert!(matches!(err, SessionError::Overflow));
    }

    #[test]
    fn test_newline_on_last_row_overflows() {
        let mut surface = MemorySurface::new(5, 1);
        surface.plain("ok").unwrap();
        assert!(matches!(surface.plain("\n"), Err(SessionError::Overflow)));
    }

    #[test]
    fn test_overlong_word_hard_wrapped() {
        let mut surface = MemorySurface::new(4, 3);
        surface.plain("x abcdefg").unwrap();
        assert_eq!(surface.row_text(0), "x");
        assert_eq!(surface.row_text(1), "abcd");
        assert_eq!(surface.row_text(2), "efg");
    }

    #[test]
    fn test_overlong_word_at_row_start_wraps_in_place() {
        let mut surface = MemorySurface::new(4, 2);
        surface.plain("abcdefgh").unwrap();
        assert_eq!(surface.row_text(0), "abcd");
        assert_eq!(surface.row_text(1), "efgh");
    }

    #[test]
    fn test_bold_style_recorded() {
        let mut surface = MemorySurface::new(10, 2);
        surface.bold("Hi").unwrap();
        surface.plain(" there").unwrap();
        assert!(surface.is_bold(0, 0));
        assert!(!surface.is_bold(0, 3));
    }
}
