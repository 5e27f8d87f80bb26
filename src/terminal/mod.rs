//! Terminal layer: a bounded character-grid surface and a key source.
//!
//! The crossterm implementations drive a real terminal; the in-memory ones
//! let sessions run headless.

mod keys;
mod memory;
mod surface;
mod tty;

pub use keys::{KeySource, BACKSPACE, ENTER, ESCAPE};
pub use memory::{MemorySurface, ScriptedKeys};
pub use surface::{words_and_spaces, Style, Surface};
pub use tty::{TerminalKeys, TerminalSurface, MIN_HEIGHT, MIN_WIDTH};
