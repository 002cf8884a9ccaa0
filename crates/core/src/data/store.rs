use std::collections::HashMap;

use crate::error::{GenealogyError, Result};
use crate::types::DogRecord;

/// Read access to dog records.
///
/// This is the only I/O boundary of the engine. `Ok(None)` means the id does
/// not resolve, which the walker and the pedigree builder treat as unknown
/// ancestry. `Err` is an upstream failure and is propagated to the caller
/// without retrying.
pub trait DogStore: Send + Sync {
    /// Fetch a dog by id.
    fn find_dog(&self, id: &str) -> Result<Option<DogRecord>>;
}

/// In-memory dog store keyed by id.
///
/// Parent ids are stored as given and are not required to resolve: a
/// dangling sire or dam reference is a dead end for traversal, not an error.
#[derive(Debug, Clone, Default)]
pub struct MemoryDogStore {
    dogs: HashMap<String, DogRecord>,
}

impl MemoryDogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list of records.
    ///
    /// # Errors
    /// Returns an error if two records share an id.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = DogRecord>,
    {
        let mut store = Self::new();
        for rec in records {
            store.insert(rec)?;
        }
        Ok(store)
    }

    /// Add a record.
    ///
    /// # Errors
    /// Returns an error if the id is blank or already present.
    pub fn insert(&mut self, record: DogRecord) -> Result<()> {
        if record.id.trim().is_empty() {
            return Err(GenealogyError::Data(format!(
                "Dog '{}' has an empty id",
                record.name
            )));
        }
        if self.dogs.contains_key(&record.id) {
            return Err(GenealogyError::Data(format!(
                "Duplicate dog ID: '{}'",
                record.id
            )));
        }
        self.dogs.insert(record.id.clone(), record);
        Ok(())
    }

    /// Replace the record with the same id, or add it. Returns the previous
    /// record if there was one.
    pub fn upsert(&mut self, record: DogRecord) -> Option<DogRecord> {
        self.dogs.insert(record.id.clone(), record)
    }

    /// Number of dogs in the store.
    pub fn len(&self) -> usize {
        self.dogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    /// Borrow a record without cloning it.
    pub fn get(&self, id: &str) -> Option<&DogRecord> {
        self.dogs.get(id)
    }
}

impl DogStore for MemoryDogStore {
    fn find_dog(&self, id: &str) -> Result<Option<DogRecord>> {
        Ok(self.dogs.get(id).cloned())
    }
}
