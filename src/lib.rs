//! Lodestar - weighted per-field full-text search with phonetic matching
//!
//! Lodestar indexes the configured fields of a record model into flat index
//! entries and ranks records against a free-text query. Every field carries
//! a weight; a query matches literally (exact, prefix, substring, per
//! piece) and phonetically (Double Metaphone codes), and the best match per
//! entry is scaled by the field weight and summed per record.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use lodestar::{
//!     Document, FieldDescriptor, FieldWeight, MemoryEntryStore, MemoryRecordStore,
//!     ModelSchema, SearchConfig, SearchOptions, Searcher,
//! };
//!
//! let schema = ModelSchema::new().with_field(FieldDescriptor::plain("title"));
//! let searcher = Searcher::new(
//!     "Animal",
//!     Arc::new(MemoryEntryStore::new()),
//!     Arc::new(MemoryRecordStore::new()),
//!     Arc::new(schema),
//!     vec![FieldWeight::new("title", 10.0)],
//!     SearchConfig::default(),
//! )?;
//!
//! searcher.save(Document::new("w1").with_field("title", "Blue Whale"))?;
//! let results = searcher.search(&SearchOptions::new("whale"))?;
//! assert_eq!(results.first().map(|d| d.id.as_str()), Some("w1"));
//! # Ok::<(), lodestar::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `lodestar-core`: values, records, selectors and the store traits
//! - `lodestar-storage`: in-memory entry and record stores
//! - `lodestar-search`: tokenizer, phonetic encoder, matchers, ranking,
//!   direct scan, result combination and maintenance
//!
//! Any `EntryStore`/`RecordStore` implementation can stand in for the
//! in-memory stores.

pub use lodestar_core::*;
pub use lodestar_search::*;
pub use lodestar_storage::*;
