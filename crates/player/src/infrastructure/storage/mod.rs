//! Storage adapters
//!
//! `KeyValueStore` and `RecordStore` implementations, plus the factory that
//! picks a record backend from configuration.

mod file_kv;
mod kv_record_store;
mod memory;
mod postgrest;

use std::sync::Arc;

pub use file_kv::{default_storage_path, FileKeyValueStore};
pub use kv_record_store::KeyValueRecordStore;
pub use memory::{InMemoryKeyValueStore, InMemoryRecordStore};
pub use postgrest::{PostgrestRecordStore, DEFAULT_TABLE, DEFAULT_TIMEOUT_SECS};

use crate::config::{Backend, SheetConfig};
use crate::ports::outbound::{KeyValueStore, RecordStore};

/// Opens the local key/value store named by the configuration.
pub fn open_local_storage(config: &SheetConfig) -> Arc<dyn KeyValueStore> {
    let store = match &config.storage_path {
        Some(path) => FileKeyValueStore::with_path(path),
        None => FileKeyValueStore::new(),
    };
    Arc::new(store)
}

/// Builds the record backend for sheet sessions.
pub fn build_record_store(
    config: &SheetConfig,
    local: Arc<dyn KeyValueStore>,
) -> Arc<dyn RecordStore> {
    match &config.backend {
        Backend::Local => {
            tracing::info!("Using local record storage");
            Arc::new(KeyValueRecordStore::new(local))
        }
        Backend::Rest { url, api_key } => {
            tracing::info!(url = %url, table = %config.table, "Using hosted record storage");
            Arc::new(PostgrestRecordStore::with_timeout(
                url,
                api_key,
                &config.table,
                config.http_timeout_secs,
            ))
        }
    }
}
