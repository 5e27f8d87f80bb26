//! Annotation progress report.

use anyhow::Context;
use console::style;

use crate::config::Settings;
use crate::repository::{AnnotationStore, RecordStream};
use crate::services::StatusReport;

pub fn cmd_status(settings: &Settings) -> anyhow::Result<()> {
    let records = RecordStream::load(&settings.records)
        .with_context(|| format!("Failed to load records from {}", settings.records.display()))?;
    let store = AnnotationStore::load_or_default(&settings.store)
        .with_context(|| format!("Failed to load annotations from {}", settings.store.display()))?;

    let report = StatusReport::collect(&records, &store);

    println!("\n{}", style("Topic cleaning").bold());
    println!("{}", "-".repeat(40));
    println!("{:<24} {}", "Records:", report.total_records);
    println!("{:<24} {}", "Not visited:", report.not_visited);
    println!("{:<24} {}", "Skipped:", report.skipped);
    println!("{:<24} {}", "Checked:", report.checked);
    println!("{:<24} {}", "Stored outcomes:", report.stored_outcomes);

    if !report.missing_outcomes.is_empty() {
        println!(
            "{} {} checked records are missing from the store: {}",
            style("!").yellow(),
            report.missing_outcomes.len(),
            report.missing_outcomes.join(", ")
        );
    }

    println!("\n{}", style("Hard negatives").bold());
    println!("{}", "-".repeat(40));
    println!("{:<24} {}", "Annotated:", report.hard_negatives_annotated);
    println!("{:<24} {}", "Pending:", report.hard_negatives_pending);
    println!("{:<24} {}", "Skipped:", report.hard_negatives_skipped);

    Ok(())
}
