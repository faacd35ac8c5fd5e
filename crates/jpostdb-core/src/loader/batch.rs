// crates/jpostdb-core/src/loader/batch.rs
use super::store::DocumentStore;
use super::{DEFAULT_BATCH_SIZE, DEFAULT_COLLECTION};
use crate::error::Result;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Emitted after each logical batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub written: usize,
    pub total: usize,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub written: usize,
    pub batches: usize,
}

#[derive(Debug, Clone)]
pub struct BatchLoader {
    collection: String,
    batch_size: usize,
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION)
    }
}

impl BatchLoader {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Progress granularity. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Writes every document, one `add` per document, reporting progress
    /// after each batch. Stops at the first failed write and returns its error.
    pub fn run<S, F>(&self, store: &mut S, docs: &[Value], mut on_progress: F) -> Result<LoadReport>
    where
        S: DocumentStore + ?Sized,
        F: FnMut(LoadProgress),
    {
        let total = docs.len();
        if total == 0 {
            warn!(collection = %self.collection, "document list is empty, nothing to write");
            return Ok(LoadReport {
                written: 0,
                batches: 0,
            });
        }

        let mut written = 0;
        let mut batches = 0;
        for batch in docs.chunks(self.batch_size) {
            for doc in batch {
                store.add(&self.collection, doc)?;
                written += 1;
            }
            batches += 1;
            debug!(collection = %self.collection, written, total, "batch written");
            on_progress(LoadProgress { written, total });
        }

        info!(collection = %self.collection, written, batches, "load finished");
        Ok(LoadReport { written, batches })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryDocumentStore;
    use serde_json::json;

    fn docs(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({ "seq": i })).collect()
    }

    #[test]
    fn writes_one_document_per_call_and_reports_per_batch() {
        let mut store = MemoryDocumentStore::new();
        let mut progress = Vec::new();

        let report = BatchLoader::default()
            .run(&mut store, &docs(250), |p| progress.push(p))
            .unwrap();

        assert_eq!(report, LoadReport { written: 250, batches: 3 });
        assert_eq!(store.writes(), 250);
        assert_eq!(store.documents(DEFAULT_COLLECTION).len(), 250);
        assert_eq!(
            progress.iter().map(|p| p.written).collect::<Vec<_>>(),
            vec![100, 200, 250]
        );
        assert!(progress.iter().all(|p| p.total == 250));
    }

    #[test]
    fn preserves_document_order() {
        let mut store = MemoryDocumentStore::new();
        BatchLoader::new("Cards")
            .with_batch_size(2)
            .run(&mut store, &docs(5), |_| {})
            .unwrap();
        let seqs: Vec<_> = store.documents("Cards").iter().map(|d| d["seq"].clone()).collect();
        assert_eq!(seqs, (0..5).map(|i| json!(i)).collect::<Vec<_>>());
    }

    #[test]
    fn empty_input_writes_nothing() {
        let mut store = MemoryDocumentStore::new();
        let mut called = false;
        let report = BatchLoader::default()
            .run(&mut store, &[], |_| called = true)
            .unwrap();
        assert_eq!(report.written, 0);
        assert_eq!(store.writes(), 0);
        assert!(!called);
    }

    #[test]
    fn first_failure_aborts_the_run() {
        let mut store = MemoryDocumentStore::failing_at(150);
        let mut progress = Vec::new();

        let result = BatchLoader::default().run(&mut store, &docs(300), |p| progress.push(p));

        assert!(result.is_err());
        assert_eq!(store.writes(), 151);
        assert_eq!(store.documents(DEFAULT_COLLECTION).len(), 150);
        assert_eq!(progress, vec![LoadProgress { written: 100, total: 300 }]);
    }
}
