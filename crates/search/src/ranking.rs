//! Ranking pipeline over the index entry store
//!
//! Pipeline stages:
//! 1. filter: fetch candidates with the matcher set's broad selector
//! 2. project: score each entry on the literal and phonetic chains
//! 3. group: sum entry scores per record
//! 4. sort: score descending, record id ascending on ties
//! 5. page: apply skip/limit

use std::collections::HashMap;
use std::sync::Arc;

use lodestar_core::{EntryStore, IndexEntry, RecordId, Result, ScoredRecord};

use crate::matcher::MatcherSet;

/// Options for one ranking call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankOptions {
    /// Restrict matching to these field names
    pub search_fields: Option<Vec<String>>,
    /// Number of ranked records to skip
    pub skip: usize,
    /// Maximum number of ranked records to return
    pub limit: Option<usize>,
}

impl RankOptions {
    /// Default options: all fields, no paging
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: restrict to fields
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
}

/// Scores index entries and aggregates them per record
pub struct RankingPipeline {
    entries: Arc<dyn EntryStore>,
}

impl RankingPipeline {
    /// Create a pipeline over an entry store
    pub fn new(entries: Arc<dyn EntryStore>) -> Self {
        RankingPipeline { entries }
    }

    /// Rank the records of `model` for a matcher set
    ///
    /// An empty matcher set returns no records without touching storage.
    /// Records whose candidates all score zero are still returned.
    ///
    /// # Errors
    ///
    /// Propagates the entry store's error unchanged.
    pub fn rank(
        &self,
        model: &str,
        matchers: &MatcherSet,
        options: &RankOptions,
    ) -> Result<Vec<ScoredRecord>> {
        if matchers.is_empty() {
            return Ok(Vec::new());
        }

        let selector = matchers.candidate_selector(model, options.search_fields.as_deref());
        let candidates = self.entries.find(&selector)?;
        let candidate_count = candidates.len();

        let ranked = page(aggregate(matchers, &candidates), options);

        tracing::debug!(
            target: "lodestar::search",
            model,
            query = matchers.query(),
            candidates = candidate_count,
            results = ranked.len(),
            "Ranked index entries"
        );

        Ok(ranked)
    }
}

/// Sum entry scores per record and sort
///
/// Ordering is score descending, ties broken by record id ascending.
pub fn aggregate(matchers: &MatcherSet, entries: &[IndexEntry]) -> Vec<ScoredRecord> {
    let mut totals: HashMap<&RecordId, f64> = HashMap::new();
    for entry in entries {
        *totals.entry(&entry.record_id).or_insert(0.0) += matchers.score_entry(entry).total;
    }

    let mut ranked: Vec<ScoredRecord> = totals
        .into_iter()
        .map(|(id, score)| ScoredRecord::new(id.clone(), score))
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.record_id.cmp(&b.record_id))
    });
    ranked
}

fn page(ranked: Vec<ScoredRecord>, options: &RankOptions) -> Vec<ScoredRecord> {
    let iter = ranked.into_iter().skip(options.skip);
    match options.limit {
        Some(limit) => iter.take(limit).collect(),
        None => iter.collect(),
    }
}
