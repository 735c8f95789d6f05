//! Indexed and direct-scan queries through the facade

use crate::common::*;

fn ocean_catalog() -> TestCatalog {
    TestCatalog::new().with_animals(&[
        ("w1", "Blue whale", "ocean"),
        ("w2", "Beluga whale", "arctic"),
        ("s1", "Grey seal", "ocean"),
    ])
}

// ============================================================================
// Indexed search
// ============================================================================

#[test]
fn query_is_case_insensitive() {
    let catalog = ocean_catalog();
    assert_eq!(ids(&catalog.search("WHALE")), ids(&catalog.search("whale")));
    assert_eq!(catalog.search("WHALE").len(), 2);
}

#[test]
fn conditions_filter_resolved_records() {
    let catalog = ocean_catalog();
    let options = SearchOptions::new("whale").with_condition(Condition::eq("habitat", "ocean"));
    let results = catalog.searcher.search(&options).unwrap();
    assert_eq!(ids(&results), vec!["w1"]);
}

#[test]
fn query_fields_project_results() {
    let catalog = ocean_catalog();
    let options = SearchOptions::new("seal").with_query_fields(vec!["title".to_string()]);
    let results = catalog.searcher.search(&options).unwrap();

    let doc = results.first().unwrap();
    assert!(doc.fields.contains_key("title"));
    assert!(!doc.fields.contains_key("habitat"));
    assert!(doc.score > 0.0);
}

#[test]
fn plain_results_carry_id_and_score() {
    let catalog = ocean_catalog();
    let results = catalog
        .searcher
        .search(&SearchOptions::new("seal").with_document(false))
        .unwrap();
    assert!(!results.as_documents);

    let plain = results.into_plain();
    assert_eq!(plain[0].get("_id"), Some(&Value::from("s1")));
    assert!(matches!(plain[0].get("__score"), Some(Value::Float(s)) if *s > 0.0));
}

#[test]
fn translated_descriptions_are_searchable() {
    let catalog = TestCatalog::new();
    let description = Value::Object(
        [
            ("en".to_string(), Value::from("largest animal on earth")),
            ("nl".to_string(), Value::from("het grootste dier")),
        ]
        .into_iter()
        .collect(),
    );
    catalog
        .searcher
        .save(
            Document::new("w1")
                .with_field("title", "Blue whale")
                .with_field("description", description),
        )
        .unwrap();

    assert_eq!(ids(&catalog.search("grootste")), vec!["w1"]);
    assert_eq!(ids(&catalog.search("largest")), vec!["w1"]);
}

#[test]
fn blank_query_returns_nothing() {
    let catalog = ocean_catalog();
    assert!(catalog.search("   ").is_empty());
    assert!(catalog.search("").is_empty());
}

#[test]
fn unknown_weighted_field_rejects_save() {
    let entries = std::sync::Arc::new(MemoryEntryStore::new());
    let records = std::sync::Arc::new(MemoryRecordStore::new());
    let searcher = Searcher::new(
        "Animal",
        entries.clone(),
        records.clone(),
        std::sync::Arc::new(ModelSchema::new().with_field(FieldDescriptor::plain("title"))),
        vec![FieldWeight::new("title", 1.0), FieldWeight::new("weight", 1.0)],
        SearchConfig::default(),
    )
    .unwrap();

    let err = searcher
        .save(Document::new("w1").with_field("title", "Blue whale"))
        .unwrap_err();
    assert!(err.is_configuration());
    // Nothing was written
    assert!(records.is_empty());
    assert!(entries.is_empty());
}

// ============================================================================
// Direct scan
// ============================================================================

#[test]
fn simple_search_groups_by_key() {
    let catalog = TestCatalog::new().with_animals(&[
        ("1", "Blue whale", "ocean"),
        ("2", "Grey whale", "ocean"),
        ("3", "whale", "arctic"),
    ]);
    let request = ScanRequest::new("whale", ["title"]).with_key("habitat");
    let results = catalog.searcher.simple_search(&request).unwrap();

    let summary: Vec<(&str, u32, f64)> = results
        .iter()
        .map(|d| (d.id.as_str(), d.hits, d.score))
        .collect();
    // arctic: exact + contains + prefix; ocean: two contains hits
    assert_eq!(summary, vec![("3", 3, 185.0), ("1", 2, 140.0)]);
}

#[test]
fn simple_search_applies_conditions() {
    let catalog = ocean_catalog();
    let request = ScanRequest::new("whale", ["title"])
        .with_condition(Condition::eq("habitat", "arctic"));
    let results = catalog.searcher.simple_search(&request).unwrap();
    let found: Vec<&str> = results.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(found, vec!["w2"]);
}
