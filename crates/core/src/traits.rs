//! Storage collaborator traits
//!
//! This module defines the two persistence seams the search layer is built
//! against. Implementations are injected (`Arc<dyn EntryStore>`,
//! `Arc<dyn RecordStore>`); nothing in the search layer looks stores up by
//! name.
//!
//! Thread safety: all methods must be safe to call concurrently from
//! multiple threads (requires Send + Sync). Direct scans and bulk
//! maintenance call stores from a bounded worker pool.

use crate::entry::IndexEntry;
use crate::error::Result;
use crate::record::Document;
use crate::selector::Selector;
use crate::types::RecordId;

/// Persistence for index entries
///
/// # Errors
///
/// Every method returns `Error::Storage` when the backing store fails.
/// Callers never retry.
pub trait EntryStore: Send + Sync {
    /// All entries matching the selector
    fn find(&self, selector: &Selector) -> Result<Vec<IndexEntry>>;

    /// Persist a batch of new entries
    fn insert(&self, entries: Vec<IndexEntry>) -> Result<()>;

    /// Delete every entry matching the selector, returning how many were removed
    fn delete(&self, selector: &Selector) -> Result<usize>;

    /// Delete the entries matching `selector`, then insert `entries`
    ///
    /// The default runs the two steps back to back, leaving a short window
    /// in which neither the old nor the new entries are visible. Stores with
    /// per-document atomicity should override this to close the window.
    fn replace(&self, selector: &Selector, entries: Vec<IndexEntry>) -> Result<usize> {
        let removed = self.delete(selector)?;
        self.insert(entries)?;
        Ok(removed)
    }
}

/// Options for a record lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Number of matching records to skip
    pub skip: usize,
    /// Maximum number of records to return
    pub limit: Option<usize>,
    /// Return only these fields
    pub fields: Option<Vec<String>>,
    /// Depth of related-record loading; scans always pass 0
    pub recursive: u32,
}

impl FindOptions {
    /// Default options: everything, no relations
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set skip
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Builder: set limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builder: restrict returned fields
    pub fn with_fields(mut self, fields: Option<Vec<String>>) -> Self {
        self.fields = fields;
        self
    }
}

/// Persistence for source records of one model
///
/// # Errors
///
/// Every method returns `Error::Storage` when the backing store fails.
pub trait RecordStore: Send + Sync {
    /// Records matching the selector, ordered by primary identifier
    fn find(&self, selector: &Selector, options: &FindOptions) -> Result<Vec<Document>>;

    /// Insert or replace a record
    fn save(&self, document: Document) -> Result<()>;

    /// Remove a record, returning whether it existed
    fn remove(&self, id: &RecordId) -> Result<bool>;

    /// One page of all records, in primary identifier order
    fn page(&self, offset: usize, limit: usize) -> Result<Vec<Document>> {
        self.find(
            &Selector::everything(),
            &FindOptions::new().with_skip(offset).with_limit(limit),
        )
    }
}
