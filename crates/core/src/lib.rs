//! Core types and traits for Lodestar
//!
//! This crate defines the foundational types used throughout the system:
//! - RecordId: opaque primary key of a source record
//! - Value: field value enum (translations are `{lang: text}` objects)
//! - Record / Document: record capability trait and concrete record
//! - IndexEntry / ScoredRecord: persisted entries and ranked output
//! - Selector / Condition / Pattern: query shape understood by stores
//! - Schema / FieldDescriptor: field existence and translatability
//! - EntryStore / RecordStore: storage collaborator traits
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod error;
pub mod record;
pub mod schema;
pub mod selector;
pub mod traits;
pub mod types;
pub mod value;

// Re-export commonly used types and traits
pub use entry::{IndexEntry, ScoredRecord};
pub use error::{Error, Result};
pub use record::{Document, Record, ID_FIELD};
pub use schema::{FieldDescriptor, ModelSchema, Schema};
pub use selector::{Condition, FieldAccess, Pattern, Selector};
pub use traits::{EntryStore, FindOptions, RecordStore};
pub use types::RecordId;
pub use value::Value;
