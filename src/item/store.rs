//! Item store for TagRelay.
//!
//! Owned by the ingestion collaborator; the delivery core only reads it.
//! `insert` and `replace_all` exist for the ingestion side, which refills
//! the table on every scrape of the source channel.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::item::types::Item;
use crate::{Result, TagRelayError};

/// Trait for item store operations.
pub trait ItemStore: Send + Sync {
    /// Get an item by id.
    fn get(&self, id: i64) -> Result<Option<Item>>;

    /// List all items in ingestion order.
    ///
    /// The returned vector is a point-in-time snapshot; a sweep iterates
    /// it without observing items that arrive mid-sweep.
    fn list_all(&self) -> Result<Vec<Item>>;

    /// Insert or replace a single item.
    fn insert(&self, item: &Item) -> Result<()>;

    /// Replace the whole table with the given items.
    fn replace_all(&self, items: &[Item]) -> Result<()>;
}

/// In-memory item store.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    records: RwLock<BTreeMap<i64, Item>>,
}

impl MemoryItemStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemStore for MemoryItemStore {
    fn get(&self, id: i64) -> Result<Option<Item>> {
        let records = self
            .records
            .read()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        Ok(records.get(&id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Item>> {
        let records = self
            .records
            .read()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        Ok(records.values().cloned().collect())
    }

    fn insert(&self, item: &Item) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        records.insert(item.id, item.clone());
        Ok(())
    }

    fn replace_all(&self, items: &[Item]) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        records.clear();
        for item in items {
            records.insert(item.id, item.clone());
        }
        Ok(())
    }
}

/// JSON document file item store.
///
/// One pretty-printed JSON object keyed by item id, same document layout
/// as the subscription store.
pub struct JsonItemStore {
    path: PathBuf,
    records: RwLock<BTreeMap<i64, Item>>,
}

impl JsonItemStore {
    /// Open a store at the given path, loading existing records.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let table: BTreeMap<String, Item> = serde_json::from_str(&raw)?;
            table
                .into_iter()
                .filter_map(|(key, item)| key.parse::<i64>().ok().map(|id| (id, item)))
                .collect()
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    fn persist(&self, records: &BTreeMap<i64, Item>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let table: BTreeMap<String, &Item> =
            records.iter().map(|(id, v)| (id.to_string(), v)).collect();
        let raw = serde_json::to_string_pretty(&table)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl ItemStore for JsonItemStore {
    fn get(&self, id: i64) -> Result<Option<Item>> {
        let records = self
            .records
            .read()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        Ok(records.get(&id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Item>> {
        let records = self
            .records
            .read()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        Ok(records.values().cloned().collect())
    }

    fn insert(&self, item: &Item) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        records.insert(item.id, item.clone());
        self.persist(&records)
    }

    fn replace_all(&self, items: &[Item]) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        records.clear();
        for item in items {
            records.insert(item.id, item.clone());
        }
        self.persist(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_insert_and_get() {
        let store = MemoryItemStore::new();
        let item = Item::new(1, "n", "b").with_tags(["#rust"]);
        store.insert(&item).unwrap();

        assert_eq!(store.get(1).unwrap().unwrap(), item);
        assert!(store.get(2).unwrap().is_none());
    }

    #[test]
    fn test_memory_store_replace_all() {
        let store = MemoryItemStore::new();
        store.insert(&Item::new(1, "old", "b")).unwrap();

        let fresh = vec![Item::new(2, "n2", "b2"), Item::new(3, "n3", "b3")];
        store.replace_all(&fresh).unwrap();

        assert!(store.get(1).unwrap().is_none());
        assert_eq!(store.list_all().unwrap().len(), 2);
    }

    #[test]
    fn test_memory_store_list_in_id_order() {
        let store = MemoryItemStore::new();
        store.insert(&Item::new(3, "c", "b")).unwrap();
        store.insert(&Item::new(1, "a", "b")).unwrap();
        store.insert(&Item::new(2, "b", "b")).unwrap();

        let ids: Vec<i64> = store.list_all().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_json_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");

        let store = JsonItemStore::open(&path).unwrap();
        let item = Item::new(7, "Developer needed", "Remote role")
            .with_tags(["#rust", "#remote"])
            .with_message_id(1200);
        store.insert(&item).unwrap();

        let reopened = JsonItemStore::open(&path).unwrap();
        assert_eq!(reopened.get(7).unwrap().unwrap(), item);
    }

    #[test]
    fn test_json_store_replace_all_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");

        let store = JsonItemStore::open(&path).unwrap();
        store.insert(&Item::new(1, "old", "b")).unwrap();
        store.replace_all(&[Item::new(2, "new", "b")]).unwrap();

        let reopened = JsonItemStore::open(&path).unwrap();
        assert!(reopened.get(1).unwrap().is_none());
        assert!(reopened.get(2).unwrap().is_some());
    }
}
