//! Hard-negative annotation command.

use anyhow::Context;
use console::style;

use crate::config::Settings;
use crate::repository::{AnnotatedRepository, AnnotationStore};
use crate::session::{HardNegativeAnnotator, Ui};
use crate::terminal::{TerminalKeys, TerminalSurface};

use super::clean::print_summary;

/// Run an interactive hard-negative session over the annotation store.
pub fn cmd_annotate_negatives(settings: &Settings) -> anyhow::Result<()> {
    let store = AnnotationStore::load(&settings.store)
        .with_context(|| format!("Failed to load annotations from {}", settings.store.display()))?;
    let output_path = AnnotatedRepository::path_for_store(&settings.store);
    let output = AnnotatedRepository::load_or_default(&output_path)
        .with_context(|| format!("Failed to load {}", output_path.display()))?;

    let mut annotator = HardNegativeAnnotator::new(store, output, settings.retry_attempts);

    let stats = {
        let mut ui = Ui::new(TerminalSurface::open()?, TerminalKeys::new());
        annotator.run(&mut ui)?
    };

    print_summary(&stats, "annotated");
    println!(
        "  {} {}",
        style("Selections written to").dim(),
        annotator.output().path().display()
    );
    Ok(())
}
