//! Pipeline tests against an in-memory index.
//!
//! These prove the run-level properties (idempotent schema, reset then load,
//! golden records first, failed batches skipped) without a Solr instance.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use solr_seed::config::SeedConfig;
use solr_seed::dates::SolrDate;
use solr_seed::index::{IndexError, SearchIndex};
use solr_seed::loader::load_batches;
use solr_seed::models::Document;
use solr_seed::progress::NoProgress;
use solr_seed::schema::{provision_schema, FieldOutcome, SCHEMA_FIELDS};
use solr_seed::seed::run_seed;
use std::collections::BTreeSet;
use std::sync::Mutex;

// ─── Test Index ─────────────────────────────────────────────────────

/// Keeps fields and documents in memory and mimics Solr's error answers.
#[derive(Default)]
struct MemoryIndex {
    fields: Mutex<BTreeSet<String>>,
    docs: Mutex<Vec<Document>>,
    /// Every `add_documents` call, in order.
    batches: Mutex<Vec<Vec<Document>>>,
    /// Zero-based `add_documents` calls that answer 500.
    failing_calls: Vec<usize>,
    unreachable: bool,
    /// Answer `count` with this instead of the stored total.
    reported_count: Option<u64>,
}

impl MemoryIndex {
    fn failing_on(calls: &[usize]) -> Self {
        Self {
            failing_calls: calls.to_vec(),
            ..Self::default()
        }
    }

    fn docs(&self) -> Vec<Document> {
        self.docs.lock().unwrap().clone()
    }
}

fn status(status: u16, body: &str) -> IndexError {
    IndexError::Status {
        url: "memory://core".to_string(),
        status,
        body: body.to_string(),
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    fn location(&self) -> &str {
        "memory://core"
    }

    async fn add_field(&self, field: &solr_seed::schema::FieldDef) -> Result<(), IndexError> {
        if self.unreachable {
            return Err(status(503, "unavailable"));
        }
        let mut fields = self.fields.lock().unwrap();
        if !fields.insert(field.name.to_string()) {
            return Err(status(
                400,
                &format!("Field '{}' already exists.", field.name),
            ));
        }
        Ok(())
    }

    async fn add_documents(&self, docs: &[Document]) -> Result<(), IndexError> {
        let mut batches = self.batches.lock().unwrap();
        let call = batches.len();
        batches.push(docs.to_vec());
        if self.failing_calls.contains(&call) {
            return Err(status(500, "Server Error"));
        }
        self.docs.lock().unwrap().extend_from_slice(docs);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), IndexError> {
        self.docs.lock().unwrap().clear();
        Ok(())
    }

    async fn count(&self) -> Result<u64, IndexError> {
        Ok(self
            .reported_count
            .unwrap_or(self.docs.lock().unwrap().len() as u64))
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

fn config(profile: &str, total: usize, batch_size: usize) -> SeedConfig {
    let mut cfg = SeedConfig::minimal();
    cfg.run.profile = profile.to_string();
    cfg.run.total_documents = total;
    cfg.run.batch_size = batch_size;
    cfg.run.seed = Some(1234);
    cfg
}

// ─── Tests ──────────────────────────────────────────────────────────

#[tokio::test]
async fn schema_provisioning_is_idempotent() {
    let index = MemoryIndex::default();

    let first = provision_schema(&index, SCHEMA_FIELDS).await;
    assert_eq!(first.added(), SCHEMA_FIELDS.len());
    let fields_after_first = index.fields.lock().unwrap().clone();

    let second = provision_schema(&index, SCHEMA_FIELDS).await;
    assert_eq!(second.existing(), SCHEMA_FIELDS.len());
    assert_eq!(second.failed(), 0);
    assert_eq!(*index.fields.lock().unwrap(), fields_after_first);
}

#[tokio::test]
async fn unreachable_index_fails_fields_without_panicking() {
    let index = MemoryIndex {
        unreachable: true,
        ..MemoryIndex::default()
    };
    let report = provision_schema(&index, SCHEMA_FIELDS).await;
    assert_eq!(report.failed(), SCHEMA_FIELDS.len());
    assert!(report
        .fields
        .iter()
        .all(|(_, o)| matches!(o, FieldOutcome::Failed(_))));
}

#[tokio::test]
async fn reset_then_load_counts_exactly_total() {
    let index = MemoryIndex::default();
    index
        .docs
        .lock()
        .unwrap()
        .extend((0..37).map(|_| Document::new("stale")));

    let mut cfg = config("extended", 1000, 250);
    cfg.run.verify = true;
    let summary = run_seed(&cfg, &index, &NoProgress, now()).await.unwrap();

    assert_eq!(summary.reset, Some(Ok(())));
    assert_eq!(summary.load.documents_loaded(), 1000);
    assert_eq!(summary.verified_count, Some(Ok(1000)));
    assert_eq!(index.docs().len(), 1000);
    assert!(index.docs().iter().all(|d| d.doc_type != "stale"));
    assert!(summary.is_clean());
}

#[tokio::test]
async fn count_disagreeing_after_reset_fails_the_run() {
    let index = MemoryIndex {
        reported_count: Some(3),
        ..MemoryIndex::default()
    };
    let mut cfg = config("extended", 1000, 250);
    cfg.run.verify = true;
    let summary = run_seed(&cfg, &index, &NoProgress, now()).await.unwrap();

    assert_eq!(summary.load.documents_loaded(), 1000);
    assert_eq!(
        summary.verified_count,
        Some(Err("count 3, expected 1000".to_string()))
    );
    assert!(!summary.is_clean());
}

#[tokio::test]
async fn count_below_loaded_without_reset_fails_the_run() {
    let index = MemoryIndex {
        reported_count: Some(10),
        ..MemoryIndex::default()
    };
    let mut cfg = config("classic", 100, 50);
    cfg.run.verify = true;
    let summary = run_seed(&cfg, &index, &NoProgress, now()).await.unwrap();

    assert!(matches!(summary.verified_count, Some(Err(_))));
    assert!(!summary.is_clean());
}

#[tokio::test]
async fn count_including_older_documents_is_clean_without_reset() {
    let index = MemoryIndex::default();
    index.docs.lock().unwrap().push(Document::new("stale"));
    let mut cfg = config("classic", 100, 50);
    cfg.run.verify = true;
    let summary = run_seed(&cfg, &index, &NoProgress, now()).await.unwrap();

    assert_eq!(summary.verified_count, Some(Ok(101)));
    assert!(summary.is_clean());
}

#[tokio::test]
async fn classic_profile_keeps_existing_documents() {
    let index = MemoryIndex::default();
    index.docs.lock().unwrap().push(Document::new("stale"));

    let summary = run_seed(&config("classic", 100, 30), &index, &NoProgress, now())
        .await
        .unwrap();

    assert_eq!(summary.reset, None);
    assert_eq!(index.docs().len(), 101);
}

#[tokio::test]
async fn golden_records_are_sent_first_in_full_batches() {
    let index = MemoryIndex::default();
    let summary = run_seed(&config("classic", 1000, 250), &index, &NoProgress, now())
        .await
        .unwrap();

    assert_eq!(summary.golden, 24);
    assert_eq!(summary.noise, 976);

    let batches = index.batches.lock().unwrap().clone();
    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![250, 250, 250, 250]);

    let sent: Vec<Document> = batches.into_iter().flatten().collect();
    assert_eq!(sent.len(), 1000);
    assert_eq!(sent[0].fournisseur.as_deref(), Some("Haribo"));
    assert_eq!(sent[23].client.as_deref(), Some("X"));
    assert_eq!(sent, index.docs());
}

#[tokio::test]
async fn failed_batch_is_skipped_and_run_completes() {
    let index = MemoryIndex::failing_on(&[1]);
    let summary = run_seed(&config("classic", 1000, 250), &index, &NoProgress, now())
        .await
        .unwrap();

    assert_eq!(summary.load.batches.len(), 4);
    assert_eq!(summary.load.sent(), 1000);
    assert_eq!(summary.load.documents_loaded(), 750);
    let failed: Vec<usize> = summary.load.failed_batches().map(|b| b.offset).collect();
    assert_eq!(failed, vec![250]);
    assert!(summary.load.batches[1]
        .error
        .as_deref()
        .unwrap()
        .contains("Server Error"));
    assert!(!summary.is_clean());
    assert_eq!(index.batches.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn loader_handles_remainder_batch() {
    let index = MemoryIndex::default();
    let docs: Vec<Document> = (0..1003)
        .map(|i| Document::new("log").ligne(i.to_string()))
        .collect();

    let report = load_batches(&index, &docs, 250, &NoProgress).await;
    let sizes: Vec<usize> = report.batches.iter().map(|b| b.len).collect();
    assert_eq!(sizes, vec![250, 250, 250, 250, 3]);
    assert_eq!(index.docs(), docs);
}

#[tokio::test]
async fn line_12_query_returns_only_the_open_incident() {
    let index = MemoryIndex::default();
    run_seed(&config("classic", 24, 10), &index, &NoProgress, now())
        .await
        .unwrap();

    let hits: Vec<Document> = index
        .docs()
        .into_iter()
        .filter(|d| d.ligne.as_deref() == Some("12") && d.statut.as_deref() == Some("En cours"))
        .collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_type, "incident");

    let closed = index
        .docs()
        .into_iter()
        .filter(|d| d.ligne.as_deref() == Some("12") && d.statut.as_deref() == Some("Clôturé"))
        .count();
    assert_eq!(closed, 1);
}

#[tokio::test]
async fn amount_range_discriminates_golden_from_cheap_noise() {
    let index = MemoryIndex::default();
    let cheap = Document::new("facture")
        .montant(50.0)
        .date_creation(SolrDate::at(2024, 1, 1, 0, 0, 0).unwrap());
    index.add_documents(&[cheap]).await.unwrap();
    run_seed(&config("classic", 24, 24), &index, &NoProgress, now())
        .await
        .unwrap();

    let in_range: Vec<Document> = index
        .docs()
        .into_iter()
        .filter(|d| d.montant.is_some_and(|m| m > 1000.0 && m < 1500.0))
        .collect();
    assert_eq!(in_range.len(), 1);
    assert_eq!(in_range[0].montant, Some(1200.0));
}

#[tokio::test]
async fn every_loaded_document_meets_invariants() {
    let index = MemoryIndex::default();
    run_seed(&config("extended", 600, 100), &index, &NoProgress, now())
        .await
        .unwrap();

    for doc in index.docs() {
        assert!(!doc.doc_type.is_empty());
        assert!(doc.montant.map_or(true, |m| m >= 0.0));
        for date in [doc.date_creation, doc.date_modif].into_iter().flatten() {
            let text = date.to_string();
            assert!(text.ends_with('Z'));
            assert_eq!(SolrDate::parse(&text).unwrap(), date);
        }
    }
}
