//! MemoryRecordStore: in-memory source records of one model
//!
//! Documents are kept in a `BTreeMap` keyed by [`RecordId`], so every
//! lookup returns records in primary-identifier order. That ordering is what
//! makes paged scans with `skip`/`limit` deterministic.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use lodestar_core::{Document, FindOptions, RecordId, RecordStore, Result, Selector};

/// In-memory [`RecordStore`]
///
/// # Design Notes
///
/// - Stored documents never carry relevance annotations; `save` resets
///   `score` and `hits`
/// - `FindOptions::recursive` is accepted and ignored, there are no relations
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    documents: RwLock<BTreeMap<RecordId, Document>>,
    lookups: AtomicU64,
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with documents
    pub fn with_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let store = Self::new();
        {
            let mut map = store.documents.write();
            for doc in documents {
                map.insert(doc.id.clone(), Self::strip(doc));
            }
        }
        store
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Fetch one document by id
    pub fn get(&self, id: &RecordId) -> Option<Document> {
        self.documents.read().get(id).cloned()
    }

    /// Number of `find` calls served
    pub fn lookup_count(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    fn strip(mut doc: Document) -> Document {
        doc.score = 0.0;
        doc.hits = 0;
        doc
    }
}

impl RecordStore for MemoryRecordStore {
    fn find(&self, selector: &Selector, options: &FindOptions) -> Result<Vec<Document>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let documents = self.documents.read();
        let matching = documents
            .values()
            .filter(|doc| selector.matches(*doc))
            .skip(options.skip);

        let project = |doc: &Document| match &options.fields {
            Some(names) => doc.project(names),
            None => doc.clone(),
        };

        Ok(match options.limit {
            Some(limit) => matching.take(limit).map(project).collect(),
            None => matching.map(project).collect(),
        })
    }

    fn save(&self, document: Document) -> Result<()> {
        let id = document.id.clone();
        self.documents.write().insert(id, Self::strip(document));
        Ok(())
    }

    fn remove(&self, id: &RecordId) -> Result<bool> {
        Ok(self.documents.write().remove(id).is_some())
    }
}
