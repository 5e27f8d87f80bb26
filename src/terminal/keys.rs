//! Key input abstraction.

use crate::error::SessionResult;

/// Character delivered for the Enter key.
pub const ENTER: char = '\n';
/// Character delivered for the Backspace key.
pub const BACKSPACE: char = '\u{8}';
/// Character delivered for the Escape key.
pub const ESCAPE: char = '\u{1b}';

/// A blocking source of key presses.
pub trait KeySource {
    /// Block until the next key press. There is no timeout.
    fn next_key(&mut self) -> SessionResult<char>;
}

impl<K: KeySource + ?Sized> KeySource for &mut K {
    fn next_key(&mut self) -> SessionResult<char> {
        (**self).next_key()
    }
}
