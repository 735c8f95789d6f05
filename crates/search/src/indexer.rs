//! Indexer: record fields to index entries
//!
//! On every save the full entry set of a record is rebuilt and swapped in:
//!
//! 1. resolve every configured field against the schema (abort on unknown)
//! 2. build entries: one per non-empty field, or one per non-empty language
//!    of a translatable field
//! 3. replace the record's old entries with the new ones in a single store call
//!
//! Reindexing the same record is serialized by a per-record lock; different
//! records proceed in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use lodestar_core::entry::fields;
use lodestar_core::{
    Condition, EntryStore, Error, FieldDescriptor, IndexEntry, Record, RecordId, Result, Schema,
    Selector, Value,
};

use crate::phonetic;

/// A searchable field and its relative importance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWeight {
    /// Field name on the record
    pub name: String,
    /// Multiplier applied to every matcher score on this field
    pub weight: f64,
}

impl FieldWeight {
    /// Create a field weight
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        FieldWeight {
            name: name.into(),
            weight,
        }
    }
}

type LockKey = (String, RecordId);

/// Writes index entries for records
pub struct Indexer {
    entries: Arc<dyn EntryStore>,
    locks: DashMap<LockKey, Arc<Mutex<()>>>,
}

impl Indexer {
    /// Create an indexer writing to `entries`
    pub fn new(entries: Arc<dyn EntryStore>) -> Self {
        Indexer {
            entries,
            locks: DashMap::new(),
        }
    }

    /// Rebuild and replace every index entry of one record
    ///
    /// Returns the number of entries written.
    ///
    /// # Errors
    ///
    /// - `Error::UnknownField` if a configured field is not in the schema;
    ///   nothing is written
    /// - the entry store's error, unchanged
    pub fn reindex_record(
        &self,
        model: &str,
        record: &dyn Record,
        field_weights: &[FieldWeight],
        schema: &dyn Schema,
    ) -> Result<usize> {
        let built = Self::build_entries(model, record, field_weights, schema)?;
        self.with_record_lock(model, record.id(), || {
            self.replace_entries(model, record.id(), built)
        })
    }

    /// Delete every index entry of one record, returning how many were removed
    pub fn remove_record(&self, model: &str, record_id: &RecordId) -> Result<usize> {
        self.with_record_lock(model, record_id, || self.remove_entries(model, record_id))
    }

    /// Swap in a record's entries without taking its lock
    ///
    /// Callers already inside [`Indexer::with_record_lock`] for the same
    /// record use this instead of [`Indexer::reindex_record`].
    pub fn replace_entries(
        &self,
        model: &str,
        record_id: &RecordId,
        built: Vec<IndexEntry>,
    ) -> Result<usize> {
        let written = built.len();
        self.entries.replace(&owner_selector(model, record_id), built)?;
        tracing::trace!(
            target: "lodestar::search",
            model,
            record_id = %record_id,
            entries = written,
            "Reindexed record"
        );
        Ok(written)
    }

    /// Delete a record's entries without taking its lock
    pub fn remove_entries(&self, model: &str, record_id: &RecordId) -> Result<usize> {
        self.entries.delete(&owner_selector(model, record_id))
    }

    /// Resolve every configured field against the schema
    ///
    /// # Errors
    ///
    /// `Error::UnknownField` for the first field the schema lacks.
    pub fn resolve_fields<'a>(
        model: &str,
        field_weights: &'a [FieldWeight],
        schema: &dyn Schema,
    ) -> Result<Vec<(&'a FieldWeight, FieldDescriptor)>> {
        field_weights
            .iter()
            .map(|fw| match schema.field(&fw.name) {
                Some(descriptor) => Ok((fw, descriptor)),
                None => {
                    tracing::warn!(
                        target: "lodestar::search",
                        model,
                        field = fw.name.as_str(),
                        "Reindex aborted, field not in schema"
                    );
                    Err(Error::UnknownField {
                        model: model.to_string(),
                        field: fw.name.clone(),
                    })
                }
            })
            .collect()
    }

    /// Build the entries a record should have, without touching storage
    ///
    /// Every configured field is resolved against the schema before any
    /// entry is built.
    pub fn build_entries(
        model: &str,
        record: &dyn Record,
        field_weights: &[FieldWeight],
        schema: &dyn Schema,
    ) -> Result<Vec<IndexEntry>> {
        let resolved = Self::resolve_fields(model, field_weights, schema)?;

        let mut built = Vec::new();
        for (fw, descriptor) in resolved {
            let Some(value) = record.get_field(&fw.name) else {
                continue;
            };
            if value.is_empty_value() {
                continue;
            }

            let base = || {
                IndexEntry::new(
                    model,
                    record.id().clone(),
                    fw.name.as_str(),
                    fw.weight,
                    Value::Null,
                )
            };

            if descriptor.translatable {
                // Anything but a language map is skipped
                let Some(variants) = value.as_object() else {
                    continue;
                };
                for (language, text) in variants {
                    if text.is_empty_value() {
                        continue;
                    }
                    built.push(with_value(base(), text).with_language(language.as_str()));
                }
            } else {
                built.push(with_value(base(), value));
            }
        }
        Ok(built)
    }

    /// Run `f` while holding the reindex lock of one record
    ///
    /// Calls for the same `(model, record_id)` run one at a time. The lock
    /// is not reentrant.
    pub fn with_record_lock<T>(
        &self,
        model: &str,
        record_id: &RecordId,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let key = (model.to_string(), record_id.clone());
        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock();
            f()
        };

        drop(lock);
        self.locks.remove_if(&key, |_, l| Arc::strong_count(l) == 1);
        result
    }

    /// Number of records currently holding a reindex lock
    pub fn active_locks(&self) -> usize {
        self.locks.len()
    }
}

fn owner_selector(model: &str, record_id: &RecordId) -> Selector {
    Selector::everything()
        .with(Condition::eq(fields::MODEL, model))
        .with(Condition::eq(fields::RECORD_ID, record_id.as_str()))
}

fn with_value(mut entry: IndexEntry, value: &Value) -> IndexEntry {
    entry.metaphone = value.as_str().and_then(phonetic::encode_text);
    entry.value = value.clone();
    entry
}
