//! Boundary between host-shaped data and typed records.
//!
//! Host builders bind collections as loosely-typed JSON arrays with Portuguese
//! or English field names, string or numeric ids and several timestamp
//! spellings. Everything is checked and coerced here so the engine only ever
//! sees [`Collections`](crate::models::Collections).

pub mod collections;

pub use collections::{
    parse_collections, parse_collections_str, CollectionStats, IngestReport, IngestStats,
};
