//! Concurrent access to the in-memory stores

use std::sync::{Arc, Barrier};
use std::thread;

use lodestar_core::entry::fields;
use lodestar_core::{Condition, Document, EntryStore, IndexEntry, RecordId, RecordStore, Selector};
use lodestar_storage::{MemoryEntryStore, MemoryRecordStore};
use proptest::prelude::*;

fn owner(model: &str, id: &str) -> Selector {
    Selector::everything()
        .with(Condition::eq(fields::MODEL, model))
        .with(Condition::eq(fields::RECORD_ID, id))
}

fn entries_for(id: &str, count: usize, tag: usize) -> Vec<IndexEntry> {
    (0..count)
        .map(|i| {
            let field = format!("f{}", i);
            IndexEntry::new("Animal", RecordId::new(id), field, 1.0, format!("v{}", tag))
        })
        .collect()
}

// ============================================================================
// Entry store
// ============================================================================

#[test]
fn test_concurrent_replace_never_duplicates() {
    let store = Arc::new(MemoryEntryStore::new());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..100 {
                    store
                        .replace(&owner("Animal", "shared"), entries_for("shared", 3, t * 100 + i))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let group = store.entries_for("Animal", &RecordId::new("shared"));
    assert_eq!(group.len(), 3);
    // One writer's set, never a mix
    assert!(group.iter().all(|e| e.value == group[0].value));
}

#[test]
fn test_readers_see_whole_groups() {
    let store = Arc::new(MemoryEntryStore::new());
    store.insert(entries_for("r1", 4, 0)).unwrap();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 1..200 {
                store.replace(&owner("Animal", "r1"), entries_for("r1", 4, i)).unwrap();
            }
        })
    };
    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..200 {
                let found = store.find(&owner("Animal", "r1")).unwrap();
                assert_eq!(found.len(), 4);
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();
}

// ============================================================================
// Record store
// ============================================================================

#[test]
fn test_concurrent_saves_of_distinct_records() {
    let store = Arc::new(MemoryRecordStore::new());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    store
                        .save(Document::new(format!("{}-{}", t, i)).with_field("title", "Orca"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.len(), 200);
    assert_eq!(store.page(190, 50).unwrap().len(), 10);
}

proptest! {
    #[test]
    fn pages_partition_the_store(count in 0usize..40, size in 1usize..12) {
        let store = MemoryRecordStore::with_documents(
            (0..count).map(|i| Document::new(format!("r{:02}", i))),
        );
        let mut seen = Vec::new();
        let mut offset = 0;
        loop {
            let page = store.page(offset, size).unwrap();
            prop_assert!(page.len() <= size);
            if page.is_empty() {
                break;
            }
            offset += page.len();
            seen.extend(page.into_iter().map(|d| d.id.as_str().to_string()));
        }
        let expected: Vec<String> = (0..count).map(|i| format!("r{:02}", i)).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn delete_counts_what_it_removes(groups in prop::collection::vec(1usize..5, 0..10)) {
        let store = MemoryEntryStore::new();
        for (i, size) in groups.iter().enumerate() {
            store.insert(entries_for(&format!("r{}", i), *size, 0)).unwrap();
        }
        let total: usize = groups.iter().sum();
        prop_assert_eq!(store.len(), total);
        prop_assert_eq!(store.delete(&Selector::everything()).unwrap(), total);
        prop_assert!(store.is_empty());
    }
}
