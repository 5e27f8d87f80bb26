//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod annotate;
mod clean;
mod merge;
mod status;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{load_settings_with_options, EnvOverrides, LoadOptions};

#[derive(Parser)]
#[command(name = "topic-annotator")]
#[command(about = "Interactive cleaning and hard-negative annotation of topic datasets")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (before full parsing).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Review topic candidates of every pending record
    Clean {
        /// Candidate record stream (JSON Lines)
        #[arg(long)]
        records: Option<PathBuf>,

        /// Annotation store (JSON)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Select good hard negatives for cleaned texts
    AnnotateNegatives {
        /// Annotation store (JSON)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Merge hard-negative candidates into the record stream
    Merge {
        /// JSON file with mined dataset negatives per text
        #[arg(long = "from")]
        from: PathBuf,

        /// Candidate record stream (JSON Lines)
        #[arg(long)]
        records: Option<PathBuf>,

        /// Generated hard negatives to take per text
        #[arg(long)]
        hn_from_api: Option<usize>,

        /// Dataset hard negatives to take per text
        #[arg(long)]
        hn_from_dataset: Option<usize>,

        /// Prefer dataset negatives closest to this similarity
        #[arg(long)]
        threshold: Option<f64>,

        /// Re-merge texts that already have hard negatives
        #[arg(long)]
        force: bool,
    },

    /// Show annotation progress
    Status {
        /// Candidate record stream (JSON Lines)
        #[arg(long)]
        records: Option<PathBuf>,

        /// Annotation store (JSON)
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

fn log_filter(verbose: bool) -> EnvFilter {
    let default_filter = if verbose {
        "topic_annotator=info"
    } else {
        "topic_annotator=warn"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into())
}

/// Run `f` with a temporary subscriber writing to `writer`.
///
/// The log destination is itself a setting, so events raised while the
/// settings load would otherwise have no subscriber to go to.
fn with_startup_logging<W, T>(verbose: bool, writer: W, f: impl FnOnce() -> T) -> T
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer));
    tracing::subscriber::with_default(subscriber, f)
}

/// Install the tracing subscriber.
///
/// Interactive sessions own the screen, so logs go to `log_file` when one is
/// configured.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = log_filter(verbose);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose || is_verbose();

    let options = LoadOptions {
        config_path: cli.config,
        ..LoadOptions::default()
    };
    let (mut settings, _config) = with_startup_logging(verbose, std::io::stderr, || {
        load_settings_with_options(options, &EnvOverrides::from_env())
    })
    .context("Failed to load configuration")?;

    if let Some(log_file) = cli.log_file {
        settings.log_file = Some(log_file);
    }
    init_logging(verbose, settings.log_file.as_deref())?;
    tracing::debug!("Resolved settings: {:?}", settings);

    match cli.command {
        Commands::Clean { records, store } => {
            if let Some(records) = records {
                settings.records = records;
            }
            if let Some(store) = store {
                settings.store = store;
            }
            clean::cmd_clean(&settings)
        }
        Commands::AnnotateNegatives { store } => {
            if let Some(store) = store {
                settings.store = store;
            }
            annotate::cmd_annotate_negatives(&settings)
        }
        Commands::Merge {
            from,
            records,
            hn_from_api,
            hn_from_dataset,
            threshold,
            force,
        } => {
            if let Some(records) = records {
                settings.records = records;
            }
            if let Some(n) = hn_from_api {
                settings.hn_from_api = n;
            }
            if let Some(n) = hn_from_dataset {
                settings.hn_from_dataset = n;
            }
            merge::cmd_merge(&settings, &from, threshold, force)
        }
        Commands::Status { records, store } => {
            if let Some(records) = records {
                settings.records = records;
            }
            if let Some(store) = store {
                settings.store = store;
            }
            status::cmd_status(&settings)
        }
    }
}
