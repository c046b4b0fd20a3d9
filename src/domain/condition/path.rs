//! Dot-path access over nested metadata

use serde_json::{Map, Value};

/// Get a nested value using dot notation (`approval.status`, `lines.0.amount`)
///
/// Resolution stops with `None` as soon as an intermediate segment is absent,
/// null, or a scalar. An empty path resolves to nothing. A present `null` leaf
/// is returned as `Some(Value::Null)`.
pub fn get_path<'a>(target: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut segments = path.split('.');
    let mut current = target.get(segments.next()?)?;

    for segment in segments {
        current = match current {
            Value::Object(obj) => obj.get(segment)?,
            Value::Array(arr) => {
                let index: usize = segment.parse().ok()?;
                arr.get(index)?
            }
            _ => return None,
        };
    }

    Some(current)
}

/// Set a nested value using dot notation, mutating `target` in place
///
/// Every intermediate that is not an object (scalars, arrays, null) is
/// replaced with an empty object before descending.
pub fn set_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    if path.is_empty() {
        return;
    }

    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = target;

    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert(Value::Null);
        current = ensure_object(entry);
    }

    current.insert(last.to_string(), value);
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }

    match value {
        Value::Object(obj) => obj,
        _ => unreachable!("value was replaced with an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(obj) => obj,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_get_simple_and_nested() {
        let meta = record(json!({
            "vendorName": "Contoso",
            "approval": {"status": "pending", "by": {"name": "Ana"}}
        }));

        assert_eq!(get_path(&meta, "vendorName"), Some(&json!("Contoso")));
        assert_eq!(get_path(&meta, "approval.status"), Some(&json!("pending")));
        assert_eq!(get_path(&meta, "approval.by.name"), Some(&json!("Ana")));
    }

    #[test]
    fn test_get_missing_and_null_intermediate() {
        let meta = record(json!({"approval": null, "total": 10}));

        assert_eq!(get_path(&meta, "missing"), None);
        assert_eq!(get_path(&meta, "approval.status"), None);
        assert_eq!(get_path(&meta, "total.currency"), None);
    }

    #[test]
    fn test_get_null_leaf_is_present() {
        let meta = record(json!({"approval": null}));

        assert_eq!(get_path(&meta, "approval"), Some(&Value::Null));
    }

    #[test]
    fn test_get_empty_path() {
        let meta = record(json!({"": 1}));

        assert_eq!(get_path(&meta, ""), None);
    }

    #[test]
    fn test_get_array_index() {
        let meta = record(json!({"lines": [{"amount": 5}, {"amount": 7}]}));

        assert_eq!(get_path(&meta, "lines.1.amount"), Some(&json!(7)));
        assert_eq!(get_path(&meta, "lines.9.amount"), None);
        assert_eq!(get_path(&meta, "lines.first"), None);
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut meta = Map::new();

        set_path(&mut meta, "approval.review.status", json!("approved"));

        assert_eq!(
            Value::Object(meta),
            json!({"approval": {"review": {"status": "approved"}}})
        );
    }

    #[test]
    fn test_set_replaces_non_object_intermediates() {
        let mut meta = record(json!({"a": 5, "b": [1, 2], "c": null}));

        set_path(&mut meta, "a.x", json!(1));
        set_path(&mut meta, "b.y", json!(2));
        set_path(&mut meta, "c.z", json!(3));

        assert_eq!(
            Value::Object(meta),
            json!({"a": {"x": 1}, "b": {"y": 2}, "c": {"z": 3}})
        );
    }

    #[test]
    fn test_set_overwrites_leaf_and_keeps_siblings() {
        let mut meta = record(json!({"approval": {"status": "pending", "owner": "ops"}}));

        set_path(&mut meta, "approval.status", json!("approved"));

        assert_eq!(
            Value::Object(meta),
            json!({"approval": {"status": "approved", "owner": "ops"}})
        );
    }

    #[test]
    fn test_set_empty_path_is_noop() {
        let mut meta = record(json!({"a": 1}));

        set_path(&mut meta, "", json!(2));

        assert_eq!(Value::Object(meta), json!({"a": 1}));
    }
}
