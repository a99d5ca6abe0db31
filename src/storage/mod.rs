//! Persistence of the history and saved-calculation lists.
//!
//! Lists live in a key-value store as JSON arrays, newest first. A
//! [`Repository`] owns one key and knows its capacity; list edits are pure
//! functions over slices, and every edit is written straight back.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;
use crate::items::{CalculationEntry, SavedCalculation};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Store key holding the calculation history.
pub const HISTORY_KEY: &str = "calcuGeniusHistory";
/// Store key holding the saved calculations.
pub const SAVED_KEY: &str = "calcuGeniusSaved";
/// Default capacity of both lists.
pub const DEFAULT_CAPACITY: usize = 50;

/// A persisted list element with a unique id.
pub trait Record: Serialize + DeserializeOwned + Clone {
    fn id(&self) -> &str;
}

impl Record for CalculationEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for SavedCalculation {
    fn id(&self) -> &str {
        &self.id
    }
}

/// String key-value storage, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Load and save one bounded list.
pub trait Repository<T: Record> {
    fn load(&self) -> Result<Vec<T>, StorageError>;
    fn save(&self, items: &[T]) -> Result<(), StorageError>;
    fn capacity(&self) -> usize;

    /// Prepend `item`, drop the oldest beyond capacity, and persist.
    fn append(&self, items: &[T], item: T) -> Result<Vec<T>, StorageError> {
        let next = prepend_bounded(items, item, self.capacity());
        self.save(&next)?;
        Ok(next)
    }

    /// Remove the item with `id` (if present) and persist.
    fn remove(&self, items: &[T], id: &str) -> Result<Vec<T>, StorageError> {
        let next = without_id(items, id);
        self.save(&next)?;
        Ok(next)
    }

    /// Persist an empty list.
    fn clear(&self) -> Result<Vec<T>, StorageError> {
        self.save(&[])?;
        Ok(Vec::new())
    }
}

/// New list with `item` at the head, truncated to `capacity`.
pub fn prepend_bounded<T: Clone>(items: &[T], item: T, capacity: usize) -> Vec<T> {
    std::iter::once(item)
        .chain(items.iter().cloned())
        .take(capacity)
        .collect()
}

/// New list without the item whose id is `id`.
pub fn without_id<T: Record>(items: &[T], id: &str) -> Vec<T> {
    items.iter().filter(|item| item.id() != id).cloned().collect()
}

/// A [`Repository`] that stores its list as JSON under one key.
#[derive(Clone, Debug)]
pub struct JsonRepository<S, T> {
    store: S,
    key: &'static str,
    capacity: usize,
    _record: PhantomData<fn() -> T>,
}

impl<S: KeyValueStore, T: Record> JsonRepository<S, T> {
    pub fn new(store: S, key: &'static str, capacity: usize) -> Self {
        Self {
            store,
            key,
            capacity,
            _record: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl<S: KeyValueStore, T: Record> Repository<T> for JsonRepository<S, T> {
    fn load(&self) -> Result<Vec<T>, StorageError> {
        let Some(raw) = self.store.get(self.key)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            key: self.key.to_string(),
            source,
        })
    }

    fn save(&self, items: &[T]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items).map_err(|source| StorageError::Encode {
            key: self.key.to_string(),
            source,
        })?;
        self.store.put(self.key, &raw)?;
        tracing::debug!(key = self.key, count = items.len(), "list persisted");
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

/// History repository over `store`.
pub fn history_repository<S: KeyValueStore>(
    store: S,
    capacity: usize,
) -> JsonRepository<S, CalculationEntry> {
    JsonRepository::new(store, HISTORY_KEY, capacity)
}

/// Saved-calculation repository over `store`.
pub fn saved_repository<S: KeyValueStore>(
    store: S,
    capacity: usize,
) -> JsonRepository<S, SavedCalculation> {
    JsonRepository::new(store, SAVED_KEY, capacity)
}
