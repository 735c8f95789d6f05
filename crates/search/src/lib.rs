//! Weighted full-text indexing and ranking
//!
//! This crate provides:
//! - Tokenizer and Double Metaphone phonetic encoder
//! - Indexer: record fields to index entries, replaced per record
//! - MatcherSet: query to literal and phonetic priority chains
//! - RankingPipeline: score entries, sum per record, sort, page
//! - DirectScanRanker: score records by querying their fields directly
//! - Result combining (union and intersection of ranked lists)
//! - Searcher: per-model facade tying the above to the stores
//! - Bulk maintenance and `lodestar.toml` configuration
//!
//! # Usage
//!
//! ```ignore
//! let searcher = Searcher::new("Article", entries, records, schema, fields, config)?;
//! searcher.save(document)?;
//! let results = searcher.search(&SearchOptions::new("blue whale"))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod combine;
pub mod config;
pub mod indexer;
pub mod maintenance;
pub mod matcher;
pub mod phonetic;
pub mod ranking;
pub mod scan;
pub mod searcher;
pub mod tokenizer;

// Re-export commonly used types
pub use combine::{best_from_both, best_result, intersect_combine, union_combine, ResultList};
pub use config::{Importance, SearchConfig, CONFIG_FILE_NAME};
pub use indexer::{FieldWeight, Indexer};
pub use maintenance::touch_all;
pub use matcher::{EntryScore, MatchKind, Matcher, MatcherSet, PriorityChain, Track};
pub use phonetic::{double_metaphone, encode_text};
pub use ranking::{RankOptions, RankingPipeline};
pub use scan::{DirectScanRanker, Lookup, ScanRequest, Strategy};
pub use searcher::{SearchOptions, SearchResults, Searcher};
pub use tokenizer::tokenize;
