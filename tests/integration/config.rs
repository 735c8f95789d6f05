//! File-based configuration

use crate::common::*;
use tempfile::TempDir;

#[test]
fn default_file_is_written_once_and_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(lodestar::CONFIG_FILE_NAME);

    SearchConfig::write_default_if_missing(&path).unwrap();
    std::fs::write(&path, "scan_page_size = 7\n").unwrap();
    SearchConfig::write_default_if_missing(&path).unwrap();

    let config = SearchConfig::from_file(&path).unwrap();
    assert_eq!(config.scan_page_size, 7);
    assert_eq!(config.max_concurrent_lookups, 4);
}

#[test]
fn importance_from_file_drives_direct_scan() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(lodestar::CONFIG_FILE_NAME);
    let mut config = SearchConfig::default();
    config.importance.exact = 500.0;
    config.write_to_file(&path).unwrap();

    let catalog = TestCatalog::with_config(SearchConfig::from_file(&path).unwrap())
        .with_animals(&[("1", "whale", "ocean")]);
    let results = catalog
        .searcher
        .simple_search(&ScanRequest::new("whale", ["title"]))
        .unwrap();
    assert_eq!(results[0].score, 585.0);
}

#[test]
fn invalid_file_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(lodestar::CONFIG_FILE_NAME);
    std::fs::write(&path, "maintenance_parallelism = 0\n").unwrap();

    let err = SearchConfig::from_file(&path).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("maintenance_parallelism"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = SearchConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
