//! Hard-negative merge command.

use std::path::Path;

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::repository::RecordStream;
use crate::services::{DatasetNegatives, MergeEvent, MergeOptions, MergeService};

pub fn cmd_merge(
    settings: &Settings,
    from: &Path,
    threshold: Option<f64>,
    force: bool,
) -> anyhow::Result<()> {
    println!("{} Merging hard negatives from {}", style("→").cyan(), from.display());

    let negatives = DatasetNegatives::load(from)
        .with_context(|| format!("Failed to load dataset negatives from {}", from.display()))?;
    if negatives.is_empty() {
        println!(
            "{} {} lists no dataset hard negatives",
            style("!").yellow(),
            from.display()
        );
    } else {
        tracing::info!("Loaded dataset hard negatives for {} texts", negatives.len());
    }
    let mut stream = RecordStream::load(&settings.records)
        .with_context(|| format!("Failed to load records from {}", settings.records.display()))?;

    let already = stream
        .records()
        .iter()
        .filter(|r| r.potential_hard_negatives.is_some())
        .count();
    if already == stream.len() && !force {
        println!(
            "{} All texts have hard negatives. Use --force to merge again.",
            style("!").yellow()
        );
        return Ok(());
    }

    let options = MergeOptions {
        from_dataset: settings.hn_from_dataset,
        from_api: settings.hn_from_api,
        threshold,
        force,
    };
    let service = MergeService::new(negatives, options);

    let pb = ProgressBar::new(stream.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );

    let result = service.merge_and_save(&mut stream, |event| match event {
        MergeEvent::RecordMerged { text_id, .. } => {
            pb.set_message(text_id);
            pb.inc(1);
        }
        MergeEvent::RecordKept { .. } => pb.inc(1),
        MergeEvent::MissingSource { text_id, source } => {
            pb.println(format!(
                "{} No {} hard negatives for text {}",
                style("!").yellow(),
                source.as_str(),
                text_id
            ));
        }
        MergeEvent::Started { .. } | MergeEvent::Complete { .. } => {}
    })?;
    pb.finish_and_clear();

    println!(
        "{} Merged hard negatives for {} texts ({} kept)",
        style("✓").green(),
        result.merged,
        result.kept
    );
    Ok(())
}
