//! Slug-addressed records kept in a local key/value store.
//!
//! Each record is stored as a `CharacterRow` document under
//! `character:<slug>`, the same shape the hosted table returns.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sheetkeep_domain::common::{format_timestamp, parse_updated_at};
use sheetkeep_domain::{CharacterRecord, Slug};
use sheetkeep_shared::CharacterRow;

use crate::ports::outbound::{storage_keys, KeyValueStore, RecordStore, StoreError, StoredRecord};

#[derive(Clone)]
pub struct KeyValueRecordStore {
    storage: Arc<dyn KeyValueStore>,
}

impl KeyValueRecordStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl RecordStore for KeyValueRecordStore {
    async fn fetch(&self, slug: &Slug) -> Result<StoredRecord, StoreError> {
        let key = storage_keys::character_row(slug.as_str());
        let raw = self
            .storage
            .load(&key)?
            .ok_or_else(|| StoreError::not_found(slug))?;

        let row: CharacterRow = serde_json::from_str(&raw)?;
        Ok(StoredRecord {
            data: row.data_json,
            updated_at: parse_updated_at(row.updated_at.as_deref()),
        })
    }

    async fn upsert(
        &self,
        slug: &Slug,
        record: &CharacterRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let row = CharacterRow {
            slug: slug.as_str().to_string(),
            data_json: serde_json::to_value(record)?,
            updated_at: Some(format_timestamp(updated_at)),
        };
        let raw = serde_json::to_string(&row)?;
        self.storage
            .save(&storage_keys::character_row(slug.as_str()), &raw)?;

        tracing::debug!(slug = %slug, "Record written to local storage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryKeyValueStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn store() -> (KeyValueRecordStore, Arc<InMemoryKeyValueStore>) {
        let kv = Arc::new(InMemoryKeyValueStore::default());
        (KeyValueRecordStore::new(kv.clone()), kv)
    }

    #[tokio::test]
    async fn missing_row_is_not_found() {
        let (store, _) = store();
        let err = store.fetch(&Slug::new("troy").unwrap()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn upsert_creates_then_fetch_reads_back() {
        let (store, kv) = store();
        let slug = Slug::new("troy").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 1, 17, 10, 30, 0).unwrap();
        let record = CharacterRecord {
            name: "Troy".into(),
            ..CharacterRecord::default()
        };

        store.upsert(&slug, &record, at).await.unwrap();

        let raw = kv.load("character:troy").unwrap().unwrap();
        let row: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(row["slug"], json!("troy"));
        assert_eq!(row["updated_at"], json!("2026-01-17T10:30:00.000Z"));

        let fetched = store.fetch(&slug).await.unwrap();
        assert_eq!(fetched.data["name"], json!("Troy"));
        assert_eq!(fetched.updated_at, Some(at));
    }

    #[tokio::test]
    async fn corrupt_row_is_a_serialization_error() {
        let (store, kv) = store();
        kv.save("character:troy", "{").unwrap();
        let err = store.fetch(&Slug::new("troy").unwrap()).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
