//! Document store seam
//!
//! Persistence of extraction results keyed by job id lives outside this
//! workspace. [`DocumentStore`] is the boundary; [`MemoryStore`] backs
//! tests and embedders that keep everything in process.

use crate::error::StoreError;
use crate::report::ExtractionReport;
use dashmap::DashMap;

/// Storage of extraction reports keyed by job id
pub trait DocumentStore: Send + Sync {
    /// Store `report`, replacing any earlier report for the same job
    ///
    /// # Errors
    /// Backend failure.
    fn put_document(&self, job_id: &str, report: ExtractionReport) -> Result<(), StoreError>;

    /// Fetch the report for `job_id`
    ///
    /// # Errors
    /// Backend failure.
    fn get_document(&self, job_id: &str) -> Result<Option<ExtractionReport>, StoreError>;

    /// Remove the report for `job_id`; `true` when one existed
    ///
    /// # Errors
    /// Backend failure.
    fn delete_document(&self, job_id: &str) -> Result<bool, StoreError>;

    /// All stored job ids, sorted
    ///
    /// # Errors
    /// Backend failure.
    fn job_ids(&self) -> Result<Vec<String>, StoreError>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<String, ExtractionReport>,
}

impl MemoryStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reports
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn put_document(&self, job_id: &str, report: ExtractionReport) -> Result<(), StoreError> {
        if self.documents.insert(job_id.to_string(), report).is_some() {
            tracing::debug!("Replaced stored document for job {}", job_id);
        }
        Ok(())
    }

    fn get_document(&self, job_id: &str) -> Result<Option<ExtractionReport>, StoreError> {
        Ok(self.documents.get(job_id).map(|entry| entry.value().clone()))
    }

    fn delete_document(&self, job_id: &str) -> Result<bool, StoreError> {
        Ok(self.documents.remove(job_id).is_some())
    }

    fn job_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut ids: Vec<String> = self.documents.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn put_get_delete() {
        let store = MemoryStore::new();
        store.put_document("a", ExtractionReport::new("a")).unwrap();
        assert_eq!(store.get_document("a").unwrap().unwrap().job_id, "a");
        assert!(store.get_document("b").unwrap().is_none());
        assert!(store.delete_document("a").unwrap());
        assert!(!store.delete_document("a").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn shared_across_threads() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let id = format!("job-{i}");
                    store.put_document(&id, ExtractionReport::new(&id)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(
            store.job_ids().unwrap(),
            vec!["job-0", "job-1", "job-2", "job-3"]
        );
    }
}
