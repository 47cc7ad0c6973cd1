//! Hosted `characters` table over its REST interface.
//!
//! Rows are addressed with `slug=eq.<slug>`; the single-object accept header
//! makes the server answer 406 when no row (or more than one) matches.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Request, StatusCode};
use sheetkeep_domain::common::{format_timestamp, parse_updated_at};
use sheetkeep_domain::{CharacterRecord, Slug};
use sheetkeep_shared::{CharacterRow, CharacterRowUpdate};

use crate::ports::outbound::{RecordStore, StoreError, StoredRecord};

/// Default table holding character rows.
pub const DEFAULT_TABLE: &str = "characters";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Clone)]
pub struct PostgrestRecordStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl PostgrestRecordStore {
    pub fn new(base_url: &str, api_key: &str, table: &str) -> Self {
        Self::with_timeout(base_url, api_key, table, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, api_key: &str, table: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: table.to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn slug_filter(slug: &Slug) -> (&'static str, String) {
        ("slug", format!("eq.{}", slug))
    }

    fn fetch_request(&self, slug: &Slug) -> reqwest::Result<Request> {
        self.client
            .get(self.table_url())
            .query(&[Self::slug_filter(slug), ("select", "*".to_string())])
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(ACCEPT, SINGLE_OBJECT)
            .build()
    }

    fn update_request(&self, slug: &Slug, body: &CharacterRowUpdate) -> reqwest::Result<Request> {
        self.client
            .patch(self.table_url())
            .query(&[Self::slug_filter(slug)])
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .json(body)
            .build()
    }
}

#[async_trait]
impl RecordStore for PostgrestRecordStore {
    async fn fetch(&self, slug: &Slug) -> Result<StoredRecord, StoreError> {
        let request = self
            .fetch_request(slug)
            .map_err(|e| StoreError::backend("fetch", e))?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| StoreError::backend("fetch", e))?;

        let status = response.status();
        if status == StatusCode::NOT_ACCEPTABLE || status == StatusCode::NOT_FOUND {
            return Err(StoreError::not_found(slug));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::backend(
                "fetch",
                format!("{}: {}", status, error_text),
            ));
        }

        let row: CharacterRow = response
            .json()
            .await
            .map_err(StoreError::serialization)?;

        Ok(StoredRecord {
            data: row.data_json,
            updated_at: parse_updated_at(row.updated_at.as_deref()),
        })
    }

    /// Updates the existing row. The row must have been created out of band;
    /// an update matching no row succeeds without effect.
    async fn upsert(
        &self,
        slug: &Slug,
        record: &CharacterRecord,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let body = CharacterRowUpdate {
            data_json: serde_json::to_value(record)?,
            updated_at: format_timestamp(updated_at),
        };
        let request = self
            .update_request(slug, &body)
            .map_err(|e| StoreError::backend("upsert", e))?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| StoreError::backend("upsert", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::backend(
                "upsert",
                format!("{}: {}", status, error_text),
            ));
        }

        tracing::debug!(slug = %slug, table = %self.table, "Row updated");
        Ok(())
    }
}
