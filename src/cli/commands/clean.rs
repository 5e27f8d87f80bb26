//! Dataset cleaning command.

use anyhow::Context;
use console::style;

use crate::config::Settings;
use crate::repository::{AnnotationStore, PersistenceWriter, RecordStream};
use crate::session::{DatasetCleaner, SessionStats, Ui};
use crate::terminal::{TerminalKeys, TerminalSurface};

/// Run an interactive cleaning session over the record stream.
pub fn cmd_clean(settings: &Settings) -> anyhow::Result<()> {
    let records = RecordStream::load(&settings.records)
        .with_context(|| format!("Failed to load records from {}", settings.records.display()))?;
    let store = AnnotationStore::load_or_default(&settings.store)
        .with_context(|| format!("Failed to load annotations from {}", settings.store.display()))?;

    let mut cleaner = DatasetCleaner::new(PersistenceWriter::new(records, store), settings.retry_attempts);
    if cleaner.pending().is_empty() {
        println!("{} Nothing left to clean", style("✓").green());
        return Ok(());
    }

    // The terminal is restored when `ui` goes out of scope
    let stats = {
        let mut ui = Ui::new(TerminalSurface::open()?, TerminalKeys::new());
        cleaner.run(&mut ui)?
    };

    print_summary(&stats, "cleaned");
    Ok(())
}

pub(super) fn print_summary(stats: &SessionStats, activity: &str) {
    let marker = if stats.quit {
        style("!").yellow()
    } else {
        style("✓").green()
    };
    println!(
        "{} {} {} texts, skipped {}, {} left",
        marker,
        capitalize(activity),
        stats.completed,
        stats.skipped,
        stats.remaining
    );
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
