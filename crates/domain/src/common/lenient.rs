//! Lenient serde helpers for stored character data.
//!
//! Stored rows are loosely shaped JSON written by several page revisions.
//! These helpers merge whatever is present over the record defaults: a value
//! of the wrong shape degrades to the field's default instead of failing the
//! whole record.
//!
//! Use them with `#[serde(default, deserialize_with = "...")]`; serde only
//! calls `deserialize_with` when the key is present.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Renders a scalar JSON value as form text.
///
/// Strings are kept verbatim, numbers and booleans are printed, anything
/// else (null, arrays, objects) becomes the empty string.
pub fn text_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Truthiness of a stored flag, following the page's checkbox semantics.
pub fn flag_from_value(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

/// Deserialize a text field from any scalar.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

/// Deserialize a boolean flag from any JSON value.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(flag_from_value(&value))
}

/// Deserialize a nested group, falling back to its default when the stored
/// value has the wrong shape.
pub fn group<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Deserialize a list whose malformed entries become default entries.
///
/// A non-array value yields an empty list.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| T::deserialize(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Probe {
        #[serde(default, deserialize_with = "text")]
        name: String,
        #[serde(default, deserialize_with = "flag")]
        shield: bool,
        #[serde(default, deserialize_with = "list")]
        tags: Vec<Tag>,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Tag {
        #[serde(default, deserialize_with = "text")]
        label: String,
    }

    #[test]
    fn text_accepts_numbers_and_nulls() {
        assert_eq!(text_from_value(&json!("Troy")), "Troy");
        assert_eq!(text_from_value(&json!(3)), "3");
        assert_eq!(text_from_value(&json!(null)), "");
        assert_eq!(text_from_value(&json!({"a": 1})), "");
    }

    #[test]
    fn flag_follows_checkbox_truthiness() {
        assert!(flag_from_value(&json!(true)));
        assert!(flag_from_value(&json!(1)));
        assert!(flag_from_value(&json!("yes")));
        assert!(!flag_from_value(&json!(0)));
        assert!(!flag_from_value(&json!("")));
        assert!(!flag_from_value(&json!(null)));
    }

    #[test]
    fn malformed_values_degrade_to_defaults() {
        let probe: Probe = serde_json::from_value(json!({
            "name": 42,
            "shield": "on",
            "tags": [{"label": "a"}, 7, null]
        }))
        .unwrap();

        assert_eq!(probe.name, "42");
        assert!(probe.shield);
        assert_eq!(
            probe.tags,
            vec![
                Tag { label: "a".into() },
                Tag::default(),
                Tag::default()
            ]
        );
    }

    #[test]
    fn non_array_list_is_empty() {
        let probe: Probe = serde_json::from_value(json!({ "tags": "sword" })).unwrap();
        assert!(probe.tags.is_empty());
    }
}
