//! Export the generated corpus as JSON without touching the index.
//!
//! Produces the exact array the loader would post, golden records first, so
//! a corpus can be inspected, diffed between seeds, or loaded by another tool.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::config::SeedConfig;
use crate::seed::{build_corpus, rng_for};

/// Generate the corpus and write it as a JSON array.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping.
pub fn run_generate(config: &SeedConfig, output: Option<&Path>, now: DateTime<Utc>) -> Result<()> {
    let profile = config.profile()?;
    let corpus = build_corpus(
        &mut rng_for(config),
        &profile,
        config.run.total_documents,
        config.run.start_year,
        now,
    )?;

    let json = serde_json::to_string_pretty(&corpus.documents)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)?;
            eprintln!(
                "Exported {} documents ({} golden, {} noise) to {}",
                corpus.documents.len(),
                corpus.golden.len(),
                corpus.noise_len(),
                path.display()
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}
