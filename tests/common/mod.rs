//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::Arc;

pub use lodestar::{
    best_from_both, best_result, intersect_combine, union_combine, Condition, Document,
    EntryStore, Error, FieldDescriptor, FieldWeight, MemoryEntryStore, MemoryRecordStore,
    ModelSchema, ResultList, ScanRequest, SearchConfig, SearchOptions, Searcher,
    Selector, Value,
};

// ============================================================================
// TestCatalog - a searcher over fresh in-memory stores
// ============================================================================

/// A searcher over an "Animal" model with `title`, `habitat` and a
/// translatable `description`.
pub struct TestCatalog {
    pub entries: Arc<MemoryEntryStore>,
    pub records: Arc<MemoryRecordStore>,
    pub searcher: Searcher,
}

impl TestCatalog {
    /// Catalog weighting title 10, description 1
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(config: SearchConfig) -> Self {
        let entries = Arc::new(MemoryEntryStore::new());
        let records = Arc::new(MemoryRecordStore::new());
        let schema = ModelSchema::new()
            .with_field(FieldDescriptor::plain("title"))
            .with_field(FieldDescriptor::plain("habitat"))
            .with_field(FieldDescriptor::translatable("description"));
        let searcher = Searcher::new(
            "Animal",
            entries.clone(),
            records.clone(),
            Arc::new(schema),
            vec![
                FieldWeight::new("title", 10.0),
                FieldWeight::new("description", 1.0),
            ],
            config,
        )
        .expect("catalog searcher");
        TestCatalog {
            entries,
            records,
            searcher,
        }
    }

    /// Save `(id, title, habitat)` triples through the searcher
    pub fn with_animals(self, animals: &[(&str, &str, &str)]) -> Self {
        for (id, title, habitat) in animals {
            self.searcher
                .save(
                    Document::new(*id)
                        .with_field("title", *title)
                        .with_field("habitat", *habitat),
                )
                .expect("save animal");
        }
        self
    }

    pub fn search(&self, query: &str) -> ResultList {
        self.searcher
            .search(&SearchOptions::new(query))
            .expect("search")
    }
}

/// Ids in result order
pub fn ids(list: &ResultList) -> Vec<String> {
    list.iter().map(|d| d.id.as_str().to_string()).collect()
}
