//! Platform ports: local key/value storage and wall-clock time.
//!
//! Implementations live in `infrastructure`.

use chrono::{DateTime, Utc};

use super::StoreError;

/// Persistent key/value storage (browser localStorage or a file on desktop)
pub trait KeyValueStore: Send + Sync {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove a value by key
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Wall-clock time, injected for testability
#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Storage key constants
///
/// These are kept in the ports layer as they define the contract for
/// what keys are used across the application.
pub mod storage_keys {
    /// The builder flow keeps at most one character per store under this key.
    pub const BUILDER_CHARACTER: &str = "dndCharacter";

    /// Prefix for slug-addressed records kept in a key/value store.
    pub const CHARACTER_ROW_PREFIX: &str = "character:";

    /// Key for the record addressed by `slug`.
    pub fn character_row(slug: &str) -> String {
        format!("{}{}", CHARACTER_ROW_PREFIX, slug)
    }
}
