//! Rows of the hosted `characters` table.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row as returned by the table API.
///
/// Columns other than these (ids, creation times) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRow {
    pub slug: String,
    /// Structured sheet contents; may be `null` for freshly created rows
    #[serde(default)]
    pub data_json: Value,
    /// RFC 3339 timestamp of the last save
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of an update against an existing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRowUpdate {
    pub data_json: Value,
    pub updated_at: String,
}
