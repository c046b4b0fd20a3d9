//! Tolerant readers for stored feedback fields
//!
//! Stored feedback predates the current types. A field with an unexpected
//! shape falls back to its default instead of failing the whole entry.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::condition::coerce::{to_epoch_millis, to_text};
use crate::domain::envelope::DocumentRef;

const DOCUMENT_ID_KEY: &str = "id";
const DOCUMENT_FILE_NAME_KEY: &str = "fileName";

/// Timestamp from RFC 3339, a looser date string, or epoch milliseconds
fn read_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| from_millis(to_epoch_millis(Some(value)))),
        Value::Number(_) => from_millis(to_epoch_millis(Some(value))),
        _ => None,
    }
}

fn from_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }

    DateTime::from_timestamp_millis(ms as i64)
}

pub(super) fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(read_timestamp(&value))
}

pub(super) fn timestamp_or_now<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(timestamp(deserializer)?.unwrap_or_else(Utc::now))
}

/// Any value of the wrong shape reads as `None`
pub(super) fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Scalars are rendered as text; null reads as empty
pub(super) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Array(_) | Value::Object(_) => String::new(),
        other => to_text(Some(&other)),
    })
}

/// Document reference tolerating a missing `id` or `fileName`
pub(super) fn document<'de, D>(deserializer: D) -> Result<Option<DocumentRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(mut obj) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    for key in [DOCUMENT_ID_KEY, DOCUMENT_FILE_NAME_KEY] {
        if !obj.get(key).is_some_and(Value::is_string) {
            obj.insert(key.to_string(), Value::String(String::new()));
        }
    }

    if !obj.get("size").is_some_and(Value::is_u64) {
        obj.remove("size");
    }

    if !obj.get("mimeType").is_some_and(Value::is_string) {
        obj.remove("mimeType");
    }

    Ok(serde_json::from_value(Value::Object(obj)).ok())
}

/// Items that are not readable are dropped; a non-array reads as empty
pub(super) fn items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(entries) => entries
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    })
}
