//! MemoryEntryStore: in-memory index entry storage
//!
//! Entries are grouped per owning record, `(model, record_id) -> Vec<IndexEntry>`,
//! inside one `BTreeMap` guarded by a `parking_lot::RwLock`.
//!
//! # Design Notes
//!
//! - **Per-document atomicity**: `replace` swaps a record's whole entry group
//!   under a single write lock, so readers observe either the old set or the
//!   new set, never an empty gap
//! - **Full scans**: `find` evaluates the selector against every entry; there
//!   are no secondary indices
//! - **Generation counter**: every mutation bumps `generation`, which tests use
//!   to observe writes

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use lodestar_core::entry::fields;
use lodestar_core::{Condition, EntryStore, IndexEntry, RecordId, Result, Selector, Value};

type GroupKey = (String, RecordId);

/// In-memory [`EntryStore`]
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    groups: RwLock<BTreeMap<GroupKey, Vec<IndexEntry>>>,
    generation: AtomicU64,
}

impl MemoryEntryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.groups.read().values().map(Vec::len).sum()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of mutations applied so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Entries owned by one record
    pub fn entries_for(&self, model: &str, record_id: &RecordId) -> Vec<IndexEntry> {
        self.groups
            .read()
            .get(&(model.to_string(), record_id.clone()))
            .cloned()
            .unwrap_or_default()
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// The single group a selector is pinned to, if it names both model and record
    fn pinned_group(selector: &Selector) -> Option<GroupKey> {
        if !selector.any.is_empty() {
            return None;
        }
        let mut model = None;
        let mut record = None;
        for condition in &selector.all {
            match condition {
                Condition::Eq {
                    field,
                    value: Value::String(s),
                } if field == fields::MODEL => model = Some(s.clone()),
                Condition::Eq {
                    field,
                    value: Value::String(s),
                } if field == fields::RECORD_ID => record = Some(RecordId::new(s.clone())),
                _ => return None,
            }
        }
        Some((model?, record?))
    }

    fn delete_locked(
        groups: &mut BTreeMap<GroupKey, Vec<IndexEntry>>,
        selector: &Selector,
    ) -> usize {
        if let Some(key) = Self::pinned_group(selector) {
            return groups.remove(&key).map(|g| g.len()).unwrap_or(0);
        }
        let mut removed = 0;
        groups.retain(|_, group| {
            let before = group.len();
            group.retain(|entry| !selector.matches(entry));
            removed += before - group.len();
            !group.is_empty()
        });
        removed
    }

    fn insert_locked(groups: &mut BTreeMap<GroupKey, Vec<IndexEntry>>, entries: Vec<IndexEntry>) {
        for entry in entries {
            groups
                .entry((entry.model.clone(), entry.record_id.clone()))
                .or_default()
                .push(entry);
        }
    }
}

impl EntryStore for MemoryEntryStore {
    fn find(&self, selector: &Selector) -> Result<Vec<IndexEntry>> {
        let groups = self.groups.read();
        Ok(groups
            .values()
            .flatten()
            .filter(|entry| selector.matches(*entry))
            .cloned()
            .collect())
    }

    fn insert(&self, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        Self::insert_locked(&mut self.groups.write(), entries);
        self.bump();
        Ok(())
    }

    fn delete(&self, selector: &Selector) -> Result<usize> {
        let removed = Self::delete_locked(&mut self.groups.write(), selector);
        if removed > 0 {
            self.bump();
        }
        Ok(removed)
    }

    fn replace(&self, selector: &Selector, entries: Vec<IndexEntry>) -> Result<usize> {
        let mut groups = self.groups.write();
        let removed = Self::delete_locked(&mut groups, selector);
        let inserted = entries.len();
        Self::insert_locked(&mut groups, entries);
        drop(groups);
        tracing::trace!(
            target: "lodestar::storage",
            removed,
            inserted,
            "Replaced index entries"
        );
        self.bump();
        Ok(removed)
    }
}
