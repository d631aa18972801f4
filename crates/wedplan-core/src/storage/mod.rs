//! Local persistence for the planner document.
//!
//! The document is kept as one JSON blob under a versioned key in a
//! `KeyValueStore`. `FileStore` writes one file per key in the data directory;
//! `MemoryStore` keeps values in memory.

pub mod document;
pub mod error;
pub mod store;

pub use document::{DocumentStorage, DOCUMENT_KEY};
pub use error::StorageError;
pub use store::{FileStore, KeyValueStore, MemoryStore};
