//! Seeding pipeline orchestration.
//!
//! Coordinates the full run: schema → optional reset → golden + noise
//! generation → batched load → optional count check. Every network step is
//! best-effort: its outcome lands in the [`RunSummary`] and the run carries
//! on. Only a corpus that cannot be generated at all stops the run.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::SeedConfig;
use crate::dates::DateWindow;
use crate::golden::{self, GoldenRecord};
use crate::index::SearchIndex;
use crate::loader::{load_batches, LoadReport};
use crate::models::Document;
use crate::noise::generate_noise;
use crate::profile::Profile;
use crate::progress::{LoadProgressEvent, LoadProgressReporter};
use crate::schema::{provision_schema, SchemaReport, SCHEMA_FIELDS};

/// The generated documents, golden records first.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub golden: Vec<GoldenRecord>,
    pub documents: Vec<Document>,
}

impl Corpus {
    pub fn noise_len(&self) -> usize {
        self.documents.len() - self.golden.len()
    }
}

/// What happened during a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub location: String,
    pub profile: &'static str,
    pub schema: SchemaReport,
    /// `None` when no reset was requested.
    pub reset: Option<Result<(), String>>,
    pub golden: usize,
    pub noise: usize,
    pub load: LoadReport,
    /// `None` when verification is off.
    pub verified_count: Option<Result<u64, String>>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.schema.failed() == 0
            && !matches!(self.reset, Some(Err(_)))
            && self.load.failed_batches().next().is_none()
            && !matches!(self.verified_count, Some(Err(_)))
    }
}

/// Build golden records followed by enough noise to reach `total` documents.
///
/// When `total` is smaller than the golden catalog, every golden record is
/// still kept and no noise is added.
pub fn build_corpus(
    rng: &mut StdRng,
    profile: &Profile,
    total: usize,
    start_year: i32,
    now: DateTime<Utc>,
) -> Result<Corpus> {
    let golden = profile
        .catalog
        .records(rng, now, start_year)
        .context("Failed to build golden records")?;

    if total < golden.len() {
        warn!(
            total,
            golden = golden.len(),
            "total_documents is below the golden catalog size, sending golden records only"
        );
    }
    let noise_needed = total.saturating_sub(golden.len());

    let mut documents = golden::documents(&golden);
    documents.extend(
        generate_noise(
            rng,
            &profile.pools,
            noise_needed,
            &DateWindow::Since { year: start_year },
            now,
        )
        .context("Failed to generate noise documents")?,
    );

    for (i, doc) in documents.iter().enumerate() {
        doc.validate()
            .with_context(|| format!("Generated document #{} is invalid", i))?;
    }

    Ok(Corpus { golden, documents })
}

pub fn rng_for(config: &SeedConfig) -> StdRng {
    match config.run.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Run the whole pipeline against `index`.
pub async fn run_seed(
    config: &SeedConfig,
    index: &dyn SearchIndex,
    progress: &dyn LoadProgressReporter,
    now: DateTime<Utc>,
) -> Result<RunSummary> {
    let profile = config.profile()?;
    info!(profile = profile.name, index = index.location(), "seeding");

    progress.report(LoadProgressEvent::Preparing { step: "schema" });
    let schema = provision_schema(index, SCHEMA_FIELDS).await;
    info!(
        added = schema.added(),
        existing = schema.existing(),
        failed = schema.failed(),
        "schema provisioned"
    );

    let reset = if config.index_reset(&profile) {
        progress.report(LoadProgressEvent::Preparing { step: "reset" });
        Some(reset_index(index).await)
    } else {
        None
    };

    let corpus = build_corpus(
        &mut rng_for(config),
        &profile,
        config.run.total_documents,
        config.run.start_year,
        now,
    )?;
    info!(
        golden = corpus.golden.len(),
        noise = corpus.noise_len(),
        "corpus generated"
    );

    let load = load_batches(index, &corpus.documents, config.run.batch_size, progress).await;

    let verified_count = if config.run.verify {
        Some(verify_count(index, &load, reset.is_some()).await)
    } else {
        None
    };

    Ok(RunSummary {
        location: index.location().to_string(),
        profile: profile.name,
        schema,
        reset,
        golden: corpus.golden.len(),
        noise: corpus.noise_len(),
        load,
        verified_count,
    })
}

async fn reset_index(index: &dyn SearchIndex) -> Result<(), String> {
    match index.delete_all().await {
        Ok(()) => {
            info!("index cleared");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "index reset failed");
            Err(e.to_string())
        }
    }
}

/// Count the index after loading. A count that contradicts what was loaded
/// is an error: exactly the loaded documents after a reset, at least them
/// otherwise.
async fn verify_count(index: &dyn SearchIndex, load: &LoadReport, was_reset: bool) -> Result<u64, String> {
    let count = index.count().await.map_err(|e| {
        warn!(error = %e, "could not count documents");
        e.to_string()
    })?;

    let loaded = load.documents_loaded() as u64;
    if was_reset && count != loaded {
        warn!(count, loaded, "index count differs from documents loaded");
        return Err(format!("count {}, expected {}", count, loaded));
    }
    if count < loaded {
        warn!(count, loaded, "index holds fewer documents than were loaded");
        return Err(format!("count {}, expected at least {}", count, loaded));
    }
    Ok(count)
}

/// Print the run summary to stdout.
pub fn print_summary(summary: &RunSummary) {
    println!("seed {} -> {}", summary.profile, summary.location);
    println!(
        "  schema: {} added, {} existing, {} failed",
        summary.schema.added(),
        summary.schema.existing(),
        summary.schema.failed()
    );
    match &summary.reset {
        None => println!("  reset: skipped"),
        Some(Ok(())) => println!("  reset: done"),
        Some(Err(e)) => println!("  reset: failed ({})", e),
    }
    println!("  golden records: {}", summary.golden);
    println!("  noise records: {}", summary.noise);
    println!("  documents sent: {}", summary.load.sent());
    let failed: Vec<usize> = summary.load.failed_batches().map(|b| b.offset).collect();
    println!(
        "  batches: {} ({} failed)",
        summary.load.batches.len(),
        failed.len()
    );
    if !failed.is_empty() {
        let offsets: Vec<String> = failed.iter().map(|o| o.to_string()).collect();
        println!("  failed batch offsets: {}", offsets.join(", "));
    }
    println!("  documents loaded: {}", summary.load.documents_loaded());
    match &summary.verified_count {
        None => {}
        Some(Ok(count)) => println!("  index count: {}", count),
        Some(Err(e)) => println!("  index count: failed ({})", e),
    }
    if summary.is_clean() {
        println!("ok");
    } else {
        println!("done with errors (see log)");
    }
}

/// `seed schema`: declare fields only.
pub async fn run_schema(index: &dyn SearchIndex) -> SchemaReport {
    let report = provision_schema(index, SCHEMA_FIELDS).await;
    println!("schema -> {}", index.location());
    for (name, outcome) in &report.fields {
        println!("  {:<16} {:?}", name, outcome);
    }
    report
}

/// `seed reset`: delete everything and commit.
pub async fn run_reset(index: &dyn SearchIndex) -> Result<()> {
    index
        .delete_all()
        .await
        .with_context(|| format!("Failed to reset {}", index.location()))?;
    println!("reset {}", index.location());
    println!("ok");
    Ok(())
}

/// `seed count`: print the match-all count.
pub async fn run_count(index: &dyn SearchIndex) -> Result<u64> {
    let count = index
        .count()
        .await
        .with_context(|| format!("Failed to count documents in {}", index.location()))?;
    println!("{}", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn corpus_reaches_requested_total_with_golden_first() {
        let profile = Profile::classic();
        let mut rng = StdRng::seed_from_u64(1);
        let corpus = build_corpus(&mut rng, &profile, 1000, 2020, now()).unwrap();

        assert_eq!(corpus.documents.len(), 1000);
        assert_eq!(corpus.golden.len(), 24);
        assert_eq!(corpus.noise_len(), 976);
        for (record, doc) in corpus.golden.iter().zip(&corpus.documents) {
            assert_eq!(&record.document, doc);
        }
    }

    #[test]
    fn small_total_keeps_all_golden_records() {
        let profile = Profile::extended();
        let mut rng = StdRng::seed_from_u64(2);
        let corpus = build_corpus(&mut rng, &profile, 5, 2020, now()).unwrap();
        assert_eq!(corpus.documents.len(), corpus.golden.len());
        assert_eq!(corpus.noise_len(), 0);
    }

    #[test]
    fn every_document_is_valid() {
        let profile = Profile::extended();
        let mut rng = StdRng::seed_from_u64(3);
        let corpus = build_corpus(&mut rng, &profile, 2000, 2020, now()).unwrap();
        for doc in &corpus.documents {
            assert!(!doc.doc_type.is_empty());
            assert!(doc.montant.map_or(true, |m| m >= 0.0));
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let mut cfg = SeedConfig::minimal();
        cfg.run.seed = Some(77);
        let profile = Profile::classic();
        let a = build_corpus(&mut rng_for(&cfg), &profile, 100, 2020, now()).unwrap();
        let b = build_corpus(&mut rng_for(&cfg), &profile, 100, 2020, now()).unwrap();
        assert_eq!(a.documents, b.documents);
    }
}
