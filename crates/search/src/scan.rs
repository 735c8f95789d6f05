//! Direct-scan ranker for collections without a maintained index
//!
//! Scores records by querying their fields directly. Each (field, strategy)
//! pair becomes one [`RecordStore::find`] lookup; every record a lookup
//! returns gains that strategy's importance and one hit.
//!
//! # Design Notes
//!
//! - Lookups run on a dedicated rayon pool bounded by
//!   `max_concurrent_lookups`, protecting the backing store from fan-out
//! - Each lookup returns its own hit list; a single-threaded reduction merges
//!   them in plan order, so the output is deterministic
//! - The first failing lookup fails the scan; nothing partial is returned

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPool;

use lodestar_core::{
    Condition, Document, Error, FindOptions, Pattern, RecordStore, Result, Selector, ID_FIELD,
};

use crate::config::SearchConfig;
use crate::matcher::MIN_PIECE_LEN;
use crate::tokenizer;

/// Parameters of one direct scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    /// Free-text query
    pub query: String,
    /// Fields to scan
    pub fields: Vec<String>,
    /// Field used to identify a record across lookups (`_id` by default)
    pub key: String,
    /// Conditions every lookup must also satisfy
    pub conditions: Vec<Condition>,
    /// Fields returned by each lookup; all fields when `None`
    pub query_fields: Option<Vec<String>>,
}

impl ScanRequest {
    /// Scan `fields` for `query`
    pub fn new(
        query: impl Into<String>,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        ScanRequest {
            query: query.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            key: ID_FIELD.to_string(),
            conditions: Vec::new(),
            query_fields: None,
        }
    }

    /// Builder: de-duplicate on another field
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Builder: add a base condition
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Builder: restrict returned fields
    pub fn with_query_fields(mut self, fields: Vec<String>) -> Self {
        self.query_fields = Some(fields);
        self
    }
}

/// How one lookup matches its field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Field equals the whole query
    Exact,
    /// Field contains the whole query
    Contains,
    /// Field starts with the whole query
    Prefix,
    /// Field starts with a keyword
    KeywordPrefix,
    /// Field equals a keyword
    KeywordExact,
    /// Field contains a keyword
    KeywordContains,
}

/// One planned store lookup
#[derive(Debug, Clone)]
pub struct Lookup {
    /// Scanned field
    pub field: String,
    /// Match strategy
    pub strategy: Strategy,
    /// Condition added to the base conditions
    pub condition: Condition,
    /// Score added per returned record
    pub importance: f64,
}

/// Scores records by scanning their fields directly
pub struct DirectScanRanker {
    records: Arc<dyn RecordStore>,
    config: SearchConfig,
    pool: ThreadPool,
}

impl DirectScanRanker {
    /// Create a ranker over a record store
    ///
    /// # Errors
    ///
    /// `Error::InvalidConfig` for out-of-range settings, `Error::ThreadPool`
    /// if the lookup pool cannot be started.
    pub fn new(records: Arc<dyn RecordStore>, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_concurrent_lookups)
            .thread_name(|i| format!("lodestar-scan-{}", i))
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;
        Ok(DirectScanRanker {
            records,
            config,
            pool,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Lookups a request expands into, in execution-merge order
    ///
    /// Per field: exact, contains, prefix on the whole query, then prefix,
    /// exact, contains per keyword. Keyword lookups are skipped when the
    /// query has exactly one keyword.
    pub fn plan(&self, request: &ScanRequest) -> Result<Vec<Lookup>> {
        let query = request.query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let keywords = tokenizer::keywords(query, MIN_PIECE_LEN);
        let importance = &self.config.importance;

        let mut lookups = Vec::new();
        for field in &request.fields {
            let mut push = |strategy, condition, importance| {
                lookups.push(Lookup {
                    field: field.clone(),
                    strategy,
                    condition,
                    importance,
                })
            };

            push(Strategy::Exact, Condition::eq(field.as_str(), query), importance.exact);
            push(
                Strategy::Contains,
                Condition::matches(field.as_str(), Pattern::contains(query)?),
                importance.contains,
            );
            push(
                Strategy::Prefix,
                Condition::matches(field.as_str(), Pattern::prefix(query)?),
                importance.prefix,
            );

            if keywords.len() == 1 {
                continue;
            }
            for keyword in &keywords {
                push(
                    Strategy::KeywordPrefix,
                    Condition::matches(field.as_str(), Pattern::prefix(keyword)?),
                    importance.keyword_prefix,
                );
                push(
                    Strategy::KeywordExact,
                    Condition::eq(field.as_str(), *keyword),
                    importance.keyword_exact,
                );
                push(
                    Strategy::KeywordContains,
                    Condition::matches(field.as_str(), Pattern::contains(keyword)?),
                    importance.keyword_contains,
                );
            }
        }
        Ok(lookups)
    }

    /// Run a scan and return records annotated with `__hits` and `__score`
    ///
    /// Sorted by score descending; ties keep first-seen order.
    ///
    /// # Errors
    ///
    /// The first lookup error, unchanged.
    pub fn search(&self, request: &ScanRequest) -> Result<Vec<Document>> {
        let lookups = self.plan(request)?;
        if lookups.is_empty() {
            return Ok(Vec::new());
        }

        let options = FindOptions {
            skip: 0,
            limit: Some(self.config.scan_page_size),
            fields: request.query_fields.clone(),
            recursive: 0,
        };

        let hit_lists = self.pool.install(|| {
            lookups
                .par_iter()
                .map(|lookup| {
                    let selector = Selector::everything()
                        .with_all(request.conditions.iter().cloned())
                        .with(lookup.condition.clone());
                    self.records.find(&selector, &options)
                })
                .collect::<Result<Vec<Vec<Document>>>>()
        })?;

        let results = merge_hits(&lookups, hit_lists, &request.key);

        tracing::debug!(
            target: "lodestar::search",
            query = request.query.as_str(),
            lookups = lookups.len(),
            results = results.len(),
            "Direct scan complete"
        );

        Ok(results)
    }
}

/// Single-threaded reduction of per-lookup hit lists
fn merge_hits(lookups: &[Lookup], hit_lists: Vec<Vec<Document>>, key: &str) -> Vec<Document> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Document> = Vec::new();

    for (lookup, hits) in lookups.iter().zip(hit_lists) {
        for mut doc in hits {
            let record_key = doc.key_for(key);
            let slot = match slots.get(&record_key) {
                Some(&slot) => slot,
                None => {
                    doc.hits = 0;
                    doc.score = 0.0;
                    slots.insert(record_key, merged.len());
                    merged.push(doc);
                    merged.len() - 1
                }
            };
            merged[slot].hits += 1;
            merged[slot].score += lookup.importance;
        }
    }

    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged
}
