//! RecordStore - persistence of character records addressed by slug
//!
//! The hosted table and the local key/value store both implement this port,
//! so the sheet session never knows which transport it talks to.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sheetkeep_domain::{CharacterRecord, Slug};

use super::StoreError;

/// A record as it came out of storage.
///
/// `data` is the raw stored document; decoding (and defaulting) is the
/// loader's job so that every backend gets the same leniency.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub data: Value,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the record stored under `slug`.
    ///
    /// Returns `StoreError::NotFound` when no record exists.
    async fn fetch(&self, slug: &Slug) -> Result<StoredRecord, StoreError>;

    /// Replace the record stored under `slug` wholesale.
    async fn upsert(
        &self,
        slug: &Slug,
        record: &CharacterRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
