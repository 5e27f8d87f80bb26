//! topic-annotator - interactive curation of topic-annotation datasets.

fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    topic_annotator::cli::run()
}
