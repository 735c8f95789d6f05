//! Integration Tests
//!
//! Cross-crate tests through the `lodestar` facade:
//! - Queries: indexed search with conditions, projection and paging
//! - Combine: union and intersection of independent searches
//! - Config: file-based configuration driving a searcher
//! - Scale: bulk maintenance over many records

#[path = "../common/mod.rs"]
mod common;

mod combine;
mod config;
mod queries;
mod scale;
