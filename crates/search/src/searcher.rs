//! Searcher: one model's index, ranking and record resolution
//!
//! A [`Searcher`] is bound to a single model. It owns the model's field
//! weights and schema, keeps the index in step with saved records, and
//! answers queries by ranking index entries and resolving the winners from
//! the record store.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lodestar_core::{Document, FieldDescriptor, ModelSchema};
//! use lodestar_search::{FieldWeight, SearchConfig, SearchOptions, Searcher};
//! # use lodestar_core::{
//! #     EntryStore, FindOptions, IndexEntry, RecordId, RecordStore, Result, Selector,
//! # };
//! # use std::sync::Mutex;
//! # #[derive(Default)]
//! # struct Entries(Mutex<Vec<IndexEntry>>);
//! # impl EntryStore for Entries {
//! #     fn find(&self, s: &Selector) -> Result<Vec<IndexEntry>> {
//! #         Ok(self.0.lock().unwrap().iter().filter(|e| s.matches(*e)).cloned().collect())
//! #     }
//! #     fn insert(&self, e: Vec<IndexEntry>) -> Result<()> {
//! #         self.0.lock().unwrap().extend(e);
//! #         Ok(())
//! #     }
//! #     fn delete(&self, s: &Selector) -> Result<usize> {
//! #         let mut v = self.0.lock().unwrap();
//! #         let n = v.len();
//! #         v.retain(|e| !s.matches(e));
//! #         Ok(n - v.len())
//! #     }
//! # }
//! # #[derive(Default)]
//! # struct Records(Mutex<Vec<Document>>);
//! # impl RecordStore for Records {
//! #     fn find(&self, s: &Selector, _: &FindOptions) -> Result<Vec<Document>> {
//! #         Ok(self.0.lock().unwrap().iter().filter(|d| s.matches(*d)).cloned().collect())
//! #     }
//! #     fn save(&self, d: Document) -> Result<()> {
//! #         let mut v = self.0.lock().unwrap(); v.retain(|x| x.id != d.id); v.push(d); Ok(())
//! #     }
//! #     fn remove(&self, _: &RecordId) -> Result<bool> { Ok(false) }
//! # }
//!
//! let schema = ModelSchema::new().with_field(FieldDescriptor::plain("title"));
//! let searcher = Searcher::new(
//!     "Animal",
//!     Arc::new(Entries::default()),
//!     Arc::new(Records::default()),
//!     Arc::new(schema),
//!     vec![FieldWeight::new("title", 10.0)],
//!     SearchConfig::default(),
//! )
//! .unwrap();
//!
//! searcher.save(Document::new("w1").with_field("title", "Blue Whale")).unwrap();
//! let results = searcher.search(&SearchOptions::new("whale")).unwrap();
//! assert_eq!(results.first().unwrap().id.as_str(), "w1");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use lodestar_core::{
    Condition, Document, EntryStore, FindOptions, RecordId, RecordStore, Result, Schema, Selector,
    ID_FIELD,
};

use crate::combine::ResultList;
use crate::config::SearchConfig;
use crate::indexer::{FieldWeight, Indexer};
use crate::maintenance;
use crate::matcher::MatcherSet;
use crate::ranking::{RankOptions, RankingPipeline};
use crate::scan::{DirectScanRanker, ScanRequest};

/// Results of an indexed search
pub type SearchResults = ResultList;

/// Per-call options of an indexed search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Free-text query
    pub query: String,
    /// Restrict matching to these fields
    pub search_fields: Option<Vec<String>>,
    /// Ranked records to skip
    pub skip: usize,
    /// Maximum ranked records
    pub limit: Option<usize>,
    /// Return documents (`true`) or plain field maps
    pub document: bool,
    /// Extra conditions applied when resolving records
    pub conditions: Vec<Condition>,
    /// Fields returned by the resolving lookup
    pub query_fields: Option<Vec<String>>,
}

impl SearchOptions {
    /// Search for `query` with default options
    pub fn new(query: impl Into<String>) -> Self {
        SearchOptions {
            query: query.into(),
            search_fields: None,
            skip: 0,
            limit: None,
            document: true,
            conditions: Vec::new(),
            query_fields: None,
        }
    }

    /// Builder: restrict matching to fields
    pub fn with_search_fields(mut self, fields: Vec<String>) -> Self {
        self.search_fields = Some(fields);
        self
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

    /// Builder: set the document flag
    pub fn with_document(mut self, document: bool) -> Self {
        self.document = document;
        self
    }

    /// Builder: add a resolving condition
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Builder: restrict returned fields
    pub fn with_query_fields(mut self, fields: Vec<String>) -> Self {
        self.query_fields = Some(fields);
        self
    }

    fn rank_options(&self) -> RankOptions {
        RankOptions {
            search_fields: self.search_fields.clone(),
            skip: self.skip,
            limit: self.limit,
        }
    }
}

/// Search facade for one model
pub struct Searcher {
    model: String,
    records: Arc<dyn RecordStore>,
    schema: Arc<dyn Schema>,
    fields: Vec<FieldWeight>,
    indexer: Indexer,
    pipeline: RankingPipeline,
    scanner: DirectScanRanker,
    config: SearchConfig,
}

impl Searcher {
    /// Bind a searcher to a model and its stores
    ///
    /// # Errors
    ///
    /// `Error::InvalidConfig` for out-of-range settings, `Error::ThreadPool`
    /// if the lookup pool cannot be started.
    pub fn new(
        model: impl Into<String>,
        entries: Arc<dyn EntryStore>,
        records: Arc<dyn RecordStore>,
        schema: Arc<dyn Schema>,
        fields: Vec<FieldWeight>,
        config: SearchConfig,
    ) -> Result<Self> {
        let scanner = DirectScanRanker::new(records.clone(), config.clone())?;
        Ok(Searcher {
            model: model.into(),
            indexer: Indexer::new(entries.clone()),
            pipeline: RankingPipeline::new(entries),
            records,
            schema,
            fields,
            scanner,
            config,
        })
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Configured field weights
    pub fn fields(&self) -> &[FieldWeight] {
        &self.fields
    }

    /// Active configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Record store this searcher resolves from
    pub fn records(&self) -> &Arc<dyn RecordStore> {
        &self.records
    }

    /// Indexed search: rank entries, resolve records, sort by score
    ///
    /// # Errors
    ///
    /// The first storage error, unchanged.
    pub fn search(&self, options: &SearchOptions) -> Result<SearchResults> {
        let matchers = MatcherSet::build(&options.query)?;
        let ranked = self
            .pipeline
            .rank(&self.model, &matchers, &options.rank_options())?;

        if ranked.is_empty() {
            return Ok(ResultList::new(Vec::new()).with_documents_flag(options.document));
        }

        let scores: HashMap<&RecordId, f64> =
            ranked.iter().map(|r| (&r.record_id, r.score)).collect();

        let selector = Selector::everything()
            .with_all(options.conditions.iter().cloned())
            .with(Condition::is_in(
                ID_FIELD,
                ranked.iter().map(|r| r.record_id.as_str()),
            ));
        let find_options = FindOptions::new().with_fields(options.query_fields.clone());

        let mut documents = self.records.find(&selector, &find_options)?;
        for doc in &mut documents {
            doc.score = scores.get(&doc.id).copied().unwrap_or(0.0);
        }

        let mut results = ResultList::new(documents).with_documents_flag(options.document);
        results.sort_by_score();

        tracing::debug!(
            target: "lodestar::search",
            model = self.model.as_str(),
            ranked = ranked.len(),
            resolved = results.len(),
            "Search complete"
        );

        Ok(results)
    }

    /// Direct scan over the record store, bypassing the index
    pub fn simple_search(&self, request: &ScanRequest) -> Result<Vec<Document>> {
        self.scanner.search(request)
    }

    /// Write a record and reindex it, returning the number of entries written
    ///
    /// The write and the reindex run under the record's reindex lock; the
    /// entries are built from the stored copy, not from `document`.
    ///
    /// # Errors
    ///
    /// `Error::UnknownField` before anything is written if a configured field
    /// is missing from the schema; otherwise the first storage error.
    pub fn save(&self, document: Document) -> Result<usize> {
        Indexer::resolve_fields(&self.model, &self.fields, self.schema.as_ref())?;
        let id = document.id.clone();
        self.indexer.with_record_lock(&self.model, &id, || {
            self.records.save(document)?;
            self.index_stored(&id)
        })
    }

    /// Reindex a record as it is, without writing it
    pub fn reindex(&self, document: &Document) -> Result<usize> {
        self.indexer
            .reindex_record(&self.model, document, &self.fields, self.schema.as_ref())
    }

    /// Reindex a record from its stored copy
    ///
    /// A record the store no longer holds loses its entries and yields 0.
    pub fn refresh(&self, id: &RecordId) -> Result<usize> {
        Indexer::resolve_fields(&self.model, &self.fields, self.schema.as_ref())?;
        self.indexer
            .with_record_lock(&self.model, id, || self.index_stored(id))
    }

    /// Delete a record and its index entries, returning whether it existed
    pub fn remove(&self, id: &RecordId) -> Result<bool> {
        self.indexer.with_record_lock(&self.model, id, || {
            self.indexer.remove_entries(&self.model, id)?;
            self.records.remove(id)
        })
    }

    /// Rebuild one record's entries from the record store; caller holds the lock
    fn index_stored(&self, id: &RecordId) -> Result<usize> {
        let selector = Selector::everything().with(Condition::eq(ID_FIELD, id.as_str()));
        let stored = self.records.find(&selector, &FindOptions::new())?;
        match stored.first() {
            Some(doc) => {
                let built = Indexer::build_entries(
                    &self.model,
                    doc,
                    &self.fields,
                    self.schema.as_ref(),
                )?;
                self.indexer.replace_entries(&self.model, id, built)
            }
            None => {
                self.indexer.remove_entries(&self.model, id)?;
                Ok(0)
            }
        }
    }

    /// Reindex every record of the model; see [`maintenance::touch_all`]
    pub fn touch_all(&self) -> Result<usize> {
        maintenance::touch_all(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodestar_core::{FieldDescriptor, IndexEntry, ModelSchema, Value};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Entries(Mutex<Vec<IndexEntry>>);

    impl EntryStore for Entries {
        fn find(&self, s: &Selector) -> Result<Vec<IndexEntry>> {
            Ok(self.0.lock().iter().filter(|e| s.matches(*e)).cloned().collect())
        }
        fn insert(&self, e: Vec<IndexEntry>) -> Result<()> {
            self.0.lock().extend(e);
            Ok(())
        }
        fn delete(&self, s: &Selector) -> Result<usize> {
            let mut v = self.0.lock();
            let n = v.len();
            v.retain(|e| !s.matches(e));
            Ok(n - v.len())
        }
    }

    /// Record store that returns records in id order, like a real store would
    #[derive(Default)]
    struct Records(Mutex<Vec<Document>>);

    impl RecordStore for Records {
        fn find(&self, s: &Selector, o: &FindOptions) -> Result<Vec<Document>> {
            let mut docs: Vec<Document> = self
                .0
                .lock()
                .iter()
                .filter(|d| s.matches(*d))
                .map(|d| match &o.fields {
                    Some(f) => d.project(f),
                    None => d.clone(),
                })
                .collect();
            docs.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(docs.into_iter().skip(o.skip).take(o.limit.unwrap_or(usize::MAX)).collect())
        }
        fn save(&self, d: Document) -> Result<()> {
            let mut v = self.0.lock();
            v.retain(|x| x.id != d.id);
            v.push(d);
            Ok(())
        }
        fn remove(&self, id: &RecordId) -> Result<bool> {
            let mut v = self.0.lock();
            let n = v.len();
            v.retain(|x| &x.id != id);
            Ok(v.len() != n)
        }
    }

    fn searcher() -> (Searcher, Arc<Entries>, Arc<Records>) {
        let entries = Arc::new(Entries::default());
        let records = Arc::new(Records::default());
        let schema = ModelSchema::new()
            .with_field(FieldDescriptor::plain("title"))
            .with_field(FieldDescriptor::plain("body"));
        let s = Searcher::new(
            "Animal",
            entries.clone(),
            records.clone(),
            Arc::new(schema),
            vec![FieldWeight::new("title", 10.0), FieldWeight::new("body", 1.0)],
            SearchConfig::default(),
        )
        .unwrap();
        (s, entries, records)
    }

    #[test]
    fn test_search_resolves_in_score_order() {
        let (s, _, _) = searcher();
        // "a" sorts first by id but scores lowest
        s.save(Document::new("a").with_field("body", "whale")).unwrap();
        s.save(Document::new("b").with_field("title", "whale")).unwrap();
        s.save(Document::new("c").with_field("title", "Grey seal")).unwrap();

        let results = s.search(&SearchOptions::new("whale")).unwrap();
        let ids: Vec<&str> = results.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(results.documents()[0].score > results.documents()[1].score);
    }

    #[test]
    fn test_search_applies_conditions_and_query_fields() {
        let (s, _, _) = searcher();
        s.save(
            Document::new("a")
                .with_field("title", "whale")
                .with_field("body", "big"),
        )
        .unwrap();
        s.save(
            Document::new("b")
                .with_field("title", "whale")
                .with_field("body", "small"),
        )
        .unwrap();

        let options = SearchOptions::new("whale")
            .with_condition(Condition::eq("body", "small"))
            .with_query_fields(vec!["title".to_string()]);
        let results = s.search(&options).unwrap();

        assert_eq!(results.len(), 1);
        let doc = results.first().unwrap();
        assert_eq!(doc.id.as_str(), "b");
        assert!(doc.fields.get("body").is_none());
        assert_eq!(doc.fields.get("title"), Some(&Value::from("whale")));
    }

    #[test]
    fn test_document_flag_is_carried() {
        let (s, _, _) = searcher();
        s.save(Document::new("a").with_field("title", "whale")).unwrap();
        let results = s
            .search(&SearchOptions::new("whale").with_document(false))
            .unwrap();
        assert!(!results.as_documents);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        let (s, _, _) = searcher();
        s.save(Document::new("a").with_field("title", "whale")).unwrap();
        assert!(s.search(&SearchOptions::new("zebra")).unwrap().is_empty());
        assert!(s.search(&SearchOptions::new("")).unwrap().is_empty());
    }

    #[test]
    fn test_save_validates_before_writing() {
        let entries = Arc::new(Entries::default());
        let records = Arc::new(Records::default());
        let s = Searcher::new(
            "Animal",
            entries.clone(),
            records.clone(),
            Arc::new(ModelSchema::new()),
            vec![FieldWeight::new("title", 1.0)],
            SearchConfig::default(),
        )
        .unwrap();

        assert!(s.save(Document::new("a").with_field("title", "whale")).is_err());
        assert!(records.0.lock().is_empty());
        assert!(entries.0.lock().is_empty());
    }

    #[test]
    fn test_remove_deletes_record_and_entries() {
        let (s, entries, records) = searcher();
        s.save(Document::new("a").with_field("title", "whale")).unwrap();
        assert!(s.remove(&RecordId::new("a")).unwrap());
        assert!(entries.0.lock().is_empty());
        assert!(records.0.lock().is_empty());
    }
}
