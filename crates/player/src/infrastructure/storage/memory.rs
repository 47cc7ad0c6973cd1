//! In-memory stores for tests and throwaway sessions.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sheetkeep_domain::{CharacterRecord, Slug};

use crate::ports::outbound::{KeyValueStore, RecordStore, StoreError, StoredRecord};

#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|e| StoreError::backend("save", e))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .read()
            .map_err(|e| StoreError::backend("load", e))?
            .get(key)
            .cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|e| StoreError::backend("remove", e))?
            .remove(key);
        Ok(())
    }
}

/// Records kept in a map keyed by slug.
///
/// Rows can be seeded with raw documents to mimic rows created elsewhere.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    rows: Arc<RwLock<HashMap<String, StoredRecord>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw row, replacing any existing one.
    pub fn seed(&self, slug: &str, data: Value) {
        if let Ok(mut rows) = self.rows.write() {
            rows.insert(
                slug.to_string(),
                StoredRecord {
                    data,
                    updated_at: None,
                },
            );
        }
    }

    /// The stored row for `slug`, if any.
    pub fn get(&self, slug: &str) -> Option<StoredRecord> {
        self.rows.read().ok()?.get(slug).cloned()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch(&self, slug: &Slug) -> Result<StoredRecord, StoreError> {
        self.rows
            .read()
            .map_err(|e| StoreError::backend("fetch", e))?
            .get(slug.as_str())
            .cloned()
            .ok_or_else(|| StoreError::not_found(slug))
    }

    async fn upsert(
        &self,
        slug: &Slug,
        record: &CharacterRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let data = serde_json::to_value(record)?;
        self.rows
            .write()
            .map_err(|e| StoreError::backend("upsert", e))?
            .insert(
                slug.as_str().to_string(),
                StoredRecord {
                    data,
                    updated_at: Some(updated_at),
                },
            );
        Ok(())
    }
}
