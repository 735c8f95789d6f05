//! In-memory reference stores for Lodestar
//!
//! This crate implements the two storage collaborators the search layer is
//! written against:
//! - MemoryEntryStore: index entries grouped per owning record, with an
//!   atomic per-record `replace`
//! - MemoryRecordStore: source records of one model, ordered by id
//!
//! Both evaluate [`lodestar_core::Selector`]s directly with full scans and
//! guard their maps with `parking_lot::RwLock`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entries;
pub mod records;

pub use entries::MemoryEntryStore;
pub use records::MemoryRecordStore;
