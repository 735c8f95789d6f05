//! Combining results of independent searches

use crate::common::*;

fn krill_catalog() -> TestCatalog {
    TestCatalog::new().with_animals(&[
        ("a", "whale krill", "ocean"),
        ("b", "whale", "ocean"),
        ("c", "krill", "ocean"),
    ])
}

#[test]
fn union_sums_records_found_by_both() {
    let catalog = krill_catalog();
    let mut whale = catalog.search("whale");
    let krill = catalog.search("krill");
    let a_alone = whale.iter().find(|d| d.id.as_str() == "a").unwrap().score;

    union_combine(&mut whale, krill.clone());

    assert_eq!(ids(&whale), vec!["b", "c", "a"]);
    assert_eq!(whale.available, 3);
    let a_both = whale.iter().find(|d| d.id.as_str() == "a").unwrap().score;
    let a_krill = krill.iter().find(|d| d.id.as_str() == "a").unwrap().score;
    assert_eq!(a_both, a_alone + a_krill);
}

#[test]
fn intersection_keeps_shared_records() {
    let catalog = krill_catalog();
    let whale = catalog.search("whale");
    let krill = catalog.search("krill");

    let both = intersect_combine(&whale, &krill);
    assert_eq!(ids(&both), vec!["a"]);
    assert_eq!(best_from_both(&whale, &krill).unwrap().id.as_str(), "a");
}

#[test]
fn best_result_prefers_merged_winner() {
    let catalog = krill_catalog();
    let whale = catalog.search("whale");
    let krill = catalog.search("krill");

    assert_eq!(best_result(&whale, None).unwrap().id.as_str(), "b");
    assert_eq!(best_result(&whale, Some(&krill)).unwrap().id.as_str(), "b");
    assert_eq!(ids(&whale), vec!["b", "a"]);
}

#[test]
fn disjoint_searches_share_nothing() {
    let catalog = krill_catalog();
    let whale = catalog.search("whale");
    let seal = catalog.search("seal");
    assert!(intersect_combine(&whale, &seal).is_empty());
    assert!(best_from_both(&whale, &seal).is_none());
}
