//! Bulk maintenance over many records

use crate::common::*;

#[test]
fn touch_all_rebuilds_a_wiped_index() {
    let config = SearchConfig {
        maintenance_batch_size: 64,
        maintenance_parallelism: 4,
        ..SearchConfig::default()
    };
    let catalog = TestCatalog::with_config(config);
    for i in 0..1000 {
        catalog
            .searcher
            .save(
                Document::new(format!("r{:04}", i))
                    .with_field("title", format!("Orca pod {}", i)),
            )
            .unwrap();
    }
    assert_eq!(catalog.entries.len(), 1000);

    catalog.entries.delete(&Selector::everything()).unwrap();
    assert!(catalog.search("orca").is_empty());

    assert_eq!(catalog.searcher.touch_all().unwrap(), 1000);
    assert_eq!(catalog.entries.len(), 1000);
    assert_eq!(catalog.search("orca").len(), 1000);
}

#[test]
fn paged_search_walks_every_result_once() {
    let catalog = TestCatalog::new();
    for i in 0..50 {
        catalog
            .searcher
            .save(Document::new(format!("r{:02}", i)).with_field("title", "Narwhal"))
            .unwrap();
    }

    let mut seen = Vec::new();
    for page in 0..5 {
        let results = catalog
            .searcher
            .search(&SearchOptions::new("narwhal").with_skip(page * 10).with_limit(10))
            .unwrap();
        assert_eq!(results.len(), 10);
        seen.extend(ids(&results));
    }
    let expected: Vec<String> = (0..50).map(|i| format!("r{:02}", i)).collect();
    assert_eq!(seen, expected);
}
