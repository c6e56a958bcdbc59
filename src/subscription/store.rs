//! Subscription store for TagRelay.
//!
//! The store is owned by the command-interface collaborator; the delivery
//! core only reads and updates records through the [`SubscriptionStore`]
//! trait. Two backends are provided: an in-memory store for tests and
//! embedding, and a JSON document file store matching the on-disk layout
//! the command interface maintains.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use tracing::warn;

use crate::subscription::types::Subscriber;
use crate::{Result, TagRelayError};

/// Trait for subscription store operations.
///
/// The core never deletes subscribers; deletion, if any, is a concern of
/// the external collaborator that owns the store.
pub trait SubscriptionStore: Send + Sync {
    /// Get a subscriber by id.
    fn get(&self, id: i64) -> Result<Option<Subscriber>>;

    /// Insert or replace a subscriber record.
    fn upsert(&self, subscriber: &Subscriber) -> Result<()>;

    /// List all subscribers.
    ///
    /// Malformed records are skipped with a warning rather than aborting
    /// the listing; a sweep must never fail because one record is broken.
    fn list_all(&self) -> Result<Vec<Subscriber>>;
}

/// In-memory subscription store.
#[derive(Debug, Default)]
pub struct MemorySubscriptionStore {
    records: RwLock<BTreeMap<i64, Subscriber>>,
}

impl MemorySubscriptionStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubscriptionStore for MemorySubscriptionStore {
    fn get(&self, id: i64) -> Result<Option<Subscriber>> {
        let records = self
            .records
            .read()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        Ok(records.get(&id).cloned())
    }

    fn upsert(&self, subscriber: &Subscriber) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        records.insert(subscriber.id, subscriber.clone());
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<Subscriber>> {
        let records = self
            .records
            .read()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        Ok(records.values().cloned().collect())
    }
}

/// JSON document file subscription store.
///
/// The whole table lives in one pretty-printed JSON object keyed by
/// subscriber id. Records are kept as raw JSON values internally so that
/// one malformed record does not poison the rest of the table.
pub struct JsonSubscriptionStore {
    path: PathBuf,
    records: RwLock<BTreeMap<i64, Value>>,
}

impl JsonSubscriptionStore {
    /// Open a store at the given path, loading existing records.
    ///
    /// A missing file is treated as an empty table; it is created on the
    /// first `upsert`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            Self::parse_table(&raw)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    fn parse_table(raw: &str) -> Result<BTreeMap<i64, Value>> {
        let value: Value = serde_json::from_str(raw)?;
        let object = value
            .as_object()
            .ok_or_else(|| TagRelayError::Store("document root is not an object".to_string()))?;

        let mut records = BTreeMap::new();
        for (key, record) in object {
            match key.parse::<i64>() {
                Ok(id) => {
                    records.insert(id, record.clone());
                }
                Err(_) => {
                    warn!("Skipping subscription record with non-numeric key: {key}");
                }
            }
        }
        Ok(records)
    }

    fn persist(&self, records: &BTreeMap<i64, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let table: BTreeMap<String, &Value> =
            records.iter().map(|(id, v)| (id.to_string(), v)).collect();
        let raw = serde_json::to_string_pretty(&table)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl SubscriptionStore for JsonSubscriptionStore {
    fn get(&self, id: i64) -> Result<Option<Subscriber>> {
        let records = self
            .records
            .read()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        match records.get(&id) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| TagRelayError::Subscription(format!("record {id}: {e}"))),
        }
    }

    fn upsert(&self, subscriber: &Subscriber) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        records.insert(subscriber.id, serde_json::to_value(subscriber)?);
        self.persist(&records)
    }

    fn list_all(&self) -> Result<Vec<Subscriber>> {
        let records = self
            .records
            .read()
            .map_err(|e| TagRelayError::Store(e.to_string()))?;
        let mut subscribers = Vec::with_capacity(records.len());
        for (id, value) in records.iter() {
            match serde_json::from_value::<Subscriber>(value.clone()) {
                Ok(sub) => subscribers.push(sub),
                Err(e) => {
                    warn!("Skipping malformed subscription record {id}: {e}");
                }
            }
        }
        Ok(subscribers)
    }
}
