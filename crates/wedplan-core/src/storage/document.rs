use tracing::{debug, info};

use crate::models::{Decoded, Document};

use super::{KeyValueStore, StorageError};

/// Storage key for the planner document. The version lives in the key name so
/// an incompatible layout can move to a new key without clobbering old data.
pub const DOCUMENT_KEY: &str = "wedplan.document.v1";

/// Loads and saves the whole planner document through a key-value store.
pub struct DocumentStorage<S> {
    store: S,
}

impl<S: KeyValueStore> DocumentStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the stored document.
    ///
    /// A missing key yields the default document. Malformed content is merged
    /// over defaults section by section; see [`Document::decode_lenient`].
    /// Only a failing read of the store itself is an error.
    pub fn load(&self) -> Result<Decoded, StorageError> {
        match self.store.get(DOCUMENT_KEY)? {
            None => {
                info!("No stored document, starting fresh");
                Ok(Decoded::default())
            }
            Some(contents) => {
                let decoded = Document::decode_lenient(&contents);
                debug!(
                    expenses = decoded.document.expenses.len(),
                    guests = decoded.document.guests.len(),
                    tasks = decoded.document.tasks.len(),
                    recovered = decoded.recovered.len(),
                    "Loaded stored document"
                );
                Ok(decoded)
            }
        }
    }

    pub fn save(&mut self, document: &Document) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(document)?;
        self.store.set(DOCUMENT_KEY, &contents)
    }

    /// Remove the stored document entirely.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(DOCUMENT_KEY)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
