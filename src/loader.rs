//! Batched bulk loading.
//!
//! The corpus is cut into consecutive slices of at most `batch_size`
//! documents and each slice is written with an immediate commit, so it is
//! searchable before the next one is sent. A failed batch is logged with its
//! starting offset and skipped; it is never retried and never stops the load.

use tracing::warn;

use crate::index::SearchIndex;
use crate::models::Document;
use crate::progress::{LoadProgressEvent, LoadProgressReporter};

/// Result of writing one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Position of the batch's first document in the corpus.
    pub offset: usize,
    pub len: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub batches: Vec<BatchOutcome>,
}

impl LoadReport {
    pub fn sent(&self) -> usize {
        self.batches.iter().map(|b| b.len).sum()
    }

    pub fn documents_loaded(&self) -> usize {
        self.batches
            .iter()
            .filter(|b| b.error.is_none())
            .map(|b| b.len)
            .sum()
    }

    pub fn failed_batches(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.batches.iter().filter(|b| b.error.is_some())
    }
}

/// Split `docs` into `(offset, slice)` pairs of at most `batch_size` each.
///
/// `batch_size` must be non-zero; config validation guarantees it.
pub fn partition(docs: &[Document], batch_size: usize) -> impl Iterator<Item = (usize, &[Document])> {
    docs.chunks(batch_size.max(1))
        .enumerate()
        .map(move |(i, chunk)| (i * batch_size.max(1), chunk))
}

/// Write `docs` to `index` batch by batch, in order.
pub async fn load_batches(
    index: &dyn SearchIndex,
    docs: &[Document],
    batch_size: usize,
    progress: &dyn LoadProgressReporter,
) -> LoadReport {
    let mut report = LoadReport::default();
    let total = docs.len() as u64;
    let batch_count = docs.len().div_ceil(batch_size.max(1)) as u64;

    for (n, (offset, batch)) in partition(docs, batch_size).enumerate() {
        let error = match index.add_documents(batch).await {
            Ok(()) => None,
            Err(e) => {
                match e.body() {
                    Some(body) => warn!(offset, status = ?e.status(), body, "batch rejected"),
                    None => warn!(offset, error = %e, "batch not delivered"),
                }
                Some(e.to_string())
            }
        };

        report.batches.push(BatchOutcome {
            offset,
            len: batch.len(),
            error,
        });

        progress.report(LoadProgressEvent::Batch {
            n: n as u64 + 1,
            batches: batch_count,
            documents: (offset + batch.len()) as u64,
            total,
        });
    }

    report
}
