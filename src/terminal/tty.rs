//! Crossterm-backed surface and keys.
//!
//! The surface owns the terminal for its lifetime: raw mode and the
//! alternate screen are entered on open and restored on drop, including
//! when a session unwinds with an error.

use std::io::{self, Stdout, Write};

use console::{measure_text_width, Term};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::error::{SessionError, SessionResult};

use super::{KeySource, Style, Surface, BACKSPACE, ENTER, ESCAPE};

/// Smallest terminal the sessions agree to start in.
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 12;

/// The real terminal as a render surface.
pub struct TerminalSurface {
    out: Stdout,
    width: u16,
    height: u16,
    row: u16,
    col: u16,
}

impl TerminalSurface {
    /// Take over the terminal.
    ///
    /// Fails when stdout is not a terminal or the window is smaller than
    /// [`MIN_WIDTH`] x [`MIN_HEIGHT`].
    pub fn open() -> SessionResult<Self> {
        // Term::stdout() can panic in containers without a TTY
        let is_terminal = std::panic::catch_unwind(|| Term::stdout().is_term()).unwrap_or(false);
        if !is_terminal || !crossterm::tty::IsTty::is_tty(&io::stdout()) {
            return Err(SessionError::NotATerminal);
        }

        let (width, height) = terminal::size()?;
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(SessionError::TerminalTooSmall {
                width,
                height,
                min_width: MIN_WIDTH,
                min_height: MIN_HEIGHT,
            });
        }

        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All), MoveTo(0, 0))
        {
            let _ = terminal::disable_raw_mode();
            return Err(e.into());
        }
        tracing::debug!("Terminal surface opened at {}x{}", width, height);

        Ok(Self {
            out,
            width,
            height,
            row: 0,
            col: 0,
        })
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn cursor_position(&self) -> (u16, u16) {
        (self.row, self.col)
    }

    fn put(&mut self, text: &str, style: Style) -> SessionResult<()> {
        if self.row >= self.height {
            return Err(SessionError::Overflow);
        }
        queue!(self.out, MoveTo(self.col, self.row))?;
        match style {
            Style::Bold => queue!(
                self.out,
                SetAttribute(Attribute::Bold),
                Print(text),
                SetAttribute(Attribute::Reset)
            )?,
            Style::Plain => queue!(self.out, Print(text))?,
        }
        let advance = u16::try_from(measure_text_width(text)).unwrap_or(u16::MAX);
        self.col = self.col.saturating_add(advance);
        Ok(())
    }

    fn move_to(&mut self, row: u16, col: u16) -> SessionResult<()> {
        if row >= self.height {
            return Err(SessionError::Overflow);
        }
        self.row = row;
        self.col = col;
        Ok(())
    }

    fn clear(&mut self) -> SessionResult<()> {
        // Pick up resizes so a retry after enlarging the window can succeed
        if let Ok((width, height)) = terminal::size() {
            self.width = width;
            self.height = height;
        }
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.row = 0;
        self.col = 0;
        Ok(())
    }

    fn flush(&mut self) -> SessionResult<()> {
        queue!(self.out, MoveTo(self.col, self.row), Show)?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        // Best-effort restore, nothing useful to do on failure
        let _ = execute!(
            self.out,
            Clear(ClearType::All),
            Show,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
        let _ = self.out.flush();
        tracing::debug!("Terminal surface closed");
    }
}

/// Key presses read from crossterm events.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl TerminalKeys {
    pub fn new() -> Self {
        Self
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> SessionResult<char> {
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let ch = match key.code {
                // Raw mode swallows SIGINT; route Ctrl-C into the confirmed quit prompt
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => 'q',
                KeyCode::Char(c) => c,
                KeyCode::Enter => ENTER,
                KeyCode::Backspace => BACKSPACE,
                KeyCode::Esc => ESCAPE,
                _ => continue,
            };
            return Ok(ch);
        }
    }
}
