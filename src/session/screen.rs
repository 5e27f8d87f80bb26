//! Screens shared by the annotation sessions.

use crate::error::SessionResult;
use crate::terminal::Surface;

/// The per-record view: statistics, controls and the text under review.
///
/// Redrawn from scratch whenever a list below it changes, so it only holds
/// borrowed display data.
#[derive(Debug, Clone, Copy)]
pub struct RecordScreen<'a> {
    /// Past-tense verb for the session statistics ("cleaned", "annotated").
    pub activity: &'a str,
    pub controls: &'a str,
    pub text: &'a str,
    pub remaining: usize,
    pub done_this_session: usize,
    pub warning: Option<&'a str>,
}

impl RecordScreen<'_> {
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> SessionResult<()> {
        surface.clear()?;

        if let Some(warning) = self.warning {
            surface.bold("WARNING: ")?;
            surface.plain(warning)?;
            surface.plain("\n\n")?;
        }

        surface.bold("Statistics:\n")?;
        surface.plain(&format!(
            "You have {} {} texts this session.\n",
            self.activity, self.done_this_session
        ))?;
        surface.plain(&format!("There are {} texts left.\n\n", self.remaining))?;

        surface.bold("Controls:\n")?;
        surface.plain(self.controls)?;

        surface.bold("\nText:\n\n")?;
        surface.plain(self.text)?;
        surface.plain("\n\n")
    }
}

/// Welcome screen shown before the first record.
#[derive(Debug, Clone)]
pub struct Introduction<'a> {
    pub title: &'a str,
    pub statistics: Vec<(&'a str, usize)>,
    pub instructions: &'a [&'a str],
    pub start_hint: &'a str,
}

impl Introduction<'_> {
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> SessionResult<()> {
        surface.clear()?;

        let banner = "*".repeat(self.title.chars().count() + 4);
        surface.plain(&format!("{}\n* {} *\n{}\n\n", banner, self.title, banner))?;

        surface.bold("Statistics:\n")?;
        for (label, value) in &self.statistics {
            surface.plain(&format!("{}: {}\n", label, value))?;
        }

        surface.bold("\nInstructions:\n")?;
        for line in self.instructions {
            surface.plain(line)?;
            surface.plain("\n")?;
        }

        surface.plain("\n")?;
        surface.plain(self.start_hint)
    }
}

/// Final screen once nothing is left to annotate.
pub fn draw_job_done<S: Surface + ?Sized>(surface: &mut S, done_this_session: usize) -> SessionResult<()> {
    surface.clear()?;
    surface.bold("All texts are annotated.\n\n")?;
    surface.plain(&format!(
        "You annotated {} texts this session. Press any key to exit.",
        done_this_session
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::MemorySurface;

    #[test]
    fn test_record_screen_layout() {
        let mut surface = MemorySurface::new(60, 20);
        RecordScreen {
            activity: "cleaned",
            controls: "Press y or n.\n",
            text: "Some text.",
            remaining: 4,
            done_this_session: 1,
            warning: None,
        }
        .draw(&mut surface)
        .unwrap();

        assert_eq!(surface.row_text(0), "Statistics:");
        assert!(surface.is_bold(0, 0));
        assert!(surface.screen().contains("You have cleaned 1 texts this session."));
        assert!(surface.screen().contains("There are 4 texts left."));
        assert!(surface.screen().contains("Some text."));
    }

    #[test]
    fn test_warning_comes_first() {
        let mut surface = MemorySurface::new(60, 20);
        RecordScreen {
            activity: "cleaned",
            controls: "",
            text: "x",
            remaining: 0,
            done_this_session: 0,
            warning: Some("tampered"),
        }
        .draw(&mut surface)
        .unwrap();
        assert_eq!(surface.row_text(0), "WARNING: tampered");
    }

    #[test]
    fn test_introduction_banner() {
        let mut surface = MemorySurface::new(60, 20);
        Introduction {
            title: "Hi",
            statistics: vec![("Number of texts", 3)],
            instructions: &["Do things."],
            start_hint: "Press 'c'.",
        }
        .draw(&mut surface)
        .unwrap();
        assert_eq!(surface.row_text(0), "******");
        assert_eq!(surface.row_text(1), "* Hi *");
        assert!(surface.screen().contains("Number of texts: 3"));
    }
}
