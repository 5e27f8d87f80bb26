//! Allow-listed key prompts.

use crate::error::{SessionError, SessionResult};
use crate::terminal::{KeySource, Surface, BACKSPACE, ENTER};

const SKIP_CONFIRMATION: &str = "\nAre you sure you want to skip this text? [Y/n] ";
const QUIT_CONFIRMATION: &str = "\nAre you sure you want to quit? [Y/n] ";

/// Answer to the start-of-session gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartChoice {
    Proceed,
    Quit,
    /// A quit was not confirmed; ask again.
    Reconsider,
}

/// Answer to the end-of-record menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Continue,
    Redo,
    /// A quit or skip was not confirmed; ask again.
    Reconsider,
}

/// A surface and a key source used together.
pub struct Ui<S, K> {
    pub surface: S,
    pub keys: K,
}

impl<S: Surface, K: KeySource> Ui<S, K> {
    pub fn new(surface: S, keys: K) -> Self {
        Self { surface, keys }
    }

    /// Block until one of `allowed` is pressed; other keys are dropped.
    pub fn read_key(&mut self, allowed: &str) -> SessionResult<char> {
        self.surface.flush()?;
        loop {
            let key = self.keys.next_key()?;
            if allowed.contains(key) {
                return Ok(key);
            }
        }
    }

    /// Block until any key is pressed.
    pub fn wait_any_key(&mut self) -> SessionResult<char> {
        self.surface.flush()?;
        self.keys.next_key()
    }

    fn echo(&mut self, key: char) -> SessionResult<()> {
        self.surface.plain(&format!("{}\n", key))
    }

    fn confirm(&mut self, question: &str) -> SessionResult<bool> {
        self.surface.plain(question)?;
        let key = self.read_key("yYnN")?;
        self.echo(key)?;
        Ok(matches!(key, 'y' | 'Y'))
    }

    /// Yes/no question that also accepts `s` to skip the whole text.
    ///
    /// A confirmed skip returns [`SessionError::Skip`]; a declined one asks
    /// the original question again.
    pub fn accept_or_reject(&mut self, prompt: &str) -> SessionResult<bool> {
        loop {
            self.surface.plain(prompt)?;
            let key = self.read_key("yYnNsS")?;
            match key {
                'y' | 'Y' => {
                    self.echo(key)?;
                    return Ok(true);
                }
                'n' | 'N' => {
                    self.echo(key)?;
                    return Ok(false);
                }
                _ => {
                    if self.confirm(SKIP_CONFIRMATION)? {
                        return Err(SessionError::Skip);
                    }
                }
            }
        }
    }

    /// Wait for `c` to start or a confirmed `q` to quit.
    pub fn quit_or_proceed(&mut self) -> SessionResult<StartChoice> {
        match self.read_key("cCqQ")? {
            'c' | 'C' => Ok(StartChoice::Proceed),
            _ => {
                if self.confirm(QUIT_CONFIRMATION)? {
                    Ok(StartChoice::Quit)
                } else {
                    Ok(StartChoice::Reconsider)
                }
            }
        }
    }

    /// End-of-record menu: continue, redo, or a confirmed quit/skip.
    pub fn redo_or_proceed(&mut self) -> SessionResult<MenuChoice> {
        let key = self.read_key("cCrRqQsS")?;
        self.echo(key)?;
        match key {
            'c' | 'C' => Ok(MenuChoice::Continue),
            'r' | 'R' => Ok(MenuChoice::Redo),
            'q' | 'Q' => {
                if self.confirm(QUIT_CONFIRMATION)? {
                    Err(SessionError::Quit)
                } else {
                    Ok(MenuChoice::Reconsider)
                }
            }
            _ => {
                if self.confirm(SKIP_CONFIRMATION)? {
                    Err(SessionError::Skip)
                } else {
                    Ok(MenuChoice::Reconsider)
                }
            }
        }
    }

    /// Plain yes/no relevance question.
    pub fn relevant(&mut self) -> SessionResult<bool> {
        self.surface.plain("Relevant? [Y/n] ")?;
        let key = self.read_key("yYnN")?;
        self.echo(key)?;
        Ok(matches!(key, 'y' | 'Y'))
    }

    /// Read a 1-based entry number out of `count` and return it 0-based.
    ///
    /// Lists shorter than ten entries take a single digit; longer ones read
    /// digits until Enter. Anything else is invalid and yields `None`.
    pub fn read_index(&mut self, count: usize) -> SessionResult<Option<usize>> {
        self.surface.flush()?;
        let mut digits = String::new();

        if count < 10 {
            let key = self.keys.next_key()?;
            self.echo(key)?;
            if key.is_ascii_digit() {
                digits.push(key);
            }
        } else {
            loop {
                self.surface.flush()?;
                match self.keys.next_key()? {
                    ENTER => {
                        self.surface.plain("\n")?;
                        break;
                    }
                    BACKSPACE => {
                        if digits.pop().is_some() {
                            let (row, col) = self.surface.cursor_position();
                            let col = col.saturating_sub(1);
                            self.surface.move_to(row, col)?;
                            self.surface.plain(" ")?;
                            self.surface.move_to(row, col)?;
                        }
                    }
                    key if key.is_ascii_digit() => {
                        digits.push(key);
                        self.surface.plain(&key.to_string())?;
                    }
                    key => {
                        self.echo(key)?;
                        return Ok(None);
                    }
                }
            }
        }

        Ok(digits
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=count).contains(n))
            .map(|n| n - 1))
    }
}
