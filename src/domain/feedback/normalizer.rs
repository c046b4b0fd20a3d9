//! Migration of stored feedback into the grouped shape
//!
//! Extractors written before corrections were grouped per document store a
//! flat list of feedback items. The shape of a stored array is decided once,
//! from its first element, and every entry is then converted into a
//! [`FeedbackGroup`].

use chrono::Utc;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use super::entity::{FeedbackGroup, FeedbackItem, LegacyFeedbackItem, StoredFeedback};

const FEEDBACK_ITEMS_KEY: &str = "feedbackItems";

/// Whether a stored feedback array is already in the grouped shape
pub fn is_grouped_shape(raw: &[Value]) -> bool {
    raw.first()
        .and_then(Value::as_object)
        .is_some_and(|first| first.contains_key(FEEDBACK_ITEMS_KEY))
}

impl StoredFeedback {
    /// Read one stored entry in the shape decided for its array
    pub fn classify(entry: &Value, grouped: bool) -> Result<Self, serde_json::Error> {
        if !entry.is_object() {
            return Err(serde::de::Error::custom("feedback entry is not an object"));
        }

        if grouped {
            let mut entry = entry.clone();

            if let Some(obj) = entry.as_object_mut() {
                let has_items = obj.get(FEEDBACK_ITEMS_KEY).is_some_and(Value::is_array);
                if !has_items {
                    obj.insert(FEEDBACK_ITEMS_KEY.to_string(), Value::Array(Vec::new()));
                }
            }

            serde_json::from_value(entry).map(Self::Grouped)
        } else {
            serde_json::from_value(entry.clone()).map(Self::Legacy)
        }
    }

    /// Convert into the grouped shape
    pub fn into_group(self) -> FeedbackGroup {
        match self {
            Self::Grouped(group) => group,
            Self::Legacy(item) => legacy_to_group(item),
        }
    }
}

/// Normalize a stored feedback array into feedback groups
///
/// Idempotent: normalizing already-grouped data returns it unchanged apart
/// from defaulting missing `feedbackItems` to `[]`. Fields with an
/// unexpected shape fall back to their defaults; only entries that are not
/// JSON objects are skipped.
pub fn normalize_feedbacks(raw: &[Value]) -> Vec<FeedbackGroup> {
    let grouped = is_grouped_shape(raw);

    raw.iter()
        .enumerate()
        .filter_map(|(idx, entry)| match StoredFeedback::classify(entry, grouped) {
            Ok(stored) => Some(stored.into_group()),
            Err(e) => {
                warn!(index = idx, grouped, "Skipping unreadable feedback entry: {}", e);
                None
            }
        })
        .collect()
}

fn legacy_to_group(item: LegacyFeedbackItem) -> FeedbackGroup {
    let id = item.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let document_id = item
        .document_id
        .or(item.filename)
        .unwrap_or_else(|| id.clone());
    let created_at = item.created_at.unwrap_or_else(Utc::now);

    FeedbackGroup {
        id: id.clone(),
        document_id,
        document: item.document,
        document_summary: item.document_summary,
        embedding: item.embedding,
        storage_bucket: item.storage_bucket,
        storage_path: item.storage_path,
        feedback_items: vec![FeedbackItem {
            id,
            target_type: item.target_type,
            target_path: item.target_path,
            feedback_text: item.feedback_text,
            created_at,
        }],
        created_at,
        updated_at: created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy_array() -> Vec<Value> {
        vec![
            json!({
                "id": "fb-1",
                "filename": "invoice-001.pdf",
                "documentSummary": "Invoice from Acme",
                "embedding": [0.1, 0.2],
                "storageBucket": "feedback",
                "storagePath": "u1/e1/fb-1.pdf",
                "targetType": "headerField",
                "targetPath": "InvoiceNumber",
                "feedbackText": "Use the number in the top right",
                "createdAt": "2024-01-10T08:00:00Z"
            }),
            json!({
                "id": "fb-2",
                "targetType": "headerField",
                "targetPath": "Total",
                "feedbackText": "Include tax"
            }),
        ]
    }

    fn grouped_array() -> Vec<Value> {
        vec![
            json!({
                "id": "g1",
                "documentId": "doc-1",
                "embedding": [1.0, 0.0],
                "feedbackItems": [{
                    "id": "i1",
                    "targetType": "headerField",
                    "targetPath": "Total",
                    "feedbackText": "Net amount",
                    "createdAt": "2024-02-01T00:00:00Z"
                }],
                "createdAt": "2024-02-01T00:00:00Z",
                "updatedAt": "2024-02-02T00:00:00Z"
            }),
            json!({
                "id": "g2",
                "documentId": "doc-2",
                "feedbackItems": null,
                "createdAt": "2024-02-03T00:00:00Z",
                "updatedAt": "2024-02-03T00:00:00Z"
            }),
        ]
    }

    fn to_values(groups: &[FeedbackGroup]) -> Vec<Value> {
        groups
            .iter()
            .map(|g| serde_json::to_value(g).unwrap())
            .collect()
    }

    #[test]
    fn test_shape_detection() {
        assert!(is_grouped_shape(&grouped_array()));
        assert!(!is_grouped_shape(&legacy_array()));
        assert!(!is_grouped_shape(&[]));
    }

    #[test]
    fn test_empty_array() {
        assert!(normalize_feedbacks(&[]).is_empty());
    }

    #[test]
    fn test_legacy_items_become_single_item_groups() {
        let groups = normalize_feedbacks(&legacy_array());

        assert_eq!(groups.len(), 2);

        let first = &groups[0];
        assert_eq!(first.id, "fb-1");
        assert_eq!(first.document_id, "invoice-001.pdf");
        assert_eq!(first.embedding, Some(vec![0.1, 0.2]));
        assert_eq!(first.storage_path.as_deref(), Some("u1/e1/fb-1.pdf"));
        assert_eq!(first.feedback_items.len(), 1);
        assert_eq!(first.feedback_items[0].id, "fb-1");
        assert_eq!(first.feedback_items[0].target_path, "InvoiceNumber");
        assert_eq!(first.feedback_items[0].created_at, first.created_at);

        let second = &groups[1];
        assert_eq!(second.document_id, "fb-2");
        assert!(second.embedding.is_none());
    }

    #[test]
    fn test_grouped_items_default_feedback_items() {
        let groups = normalize_feedbacks(&grouped_array());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].feedback_items.len(), 1);
        assert!(groups[1].feedback_items.is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent_for_grouped() {
        let once = normalize_feedbacks(&grouped_array());
        let twice = normalize_feedbacks(&to_values(&once));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_is_idempotent_for_legacy() {
        let once = normalize_feedbacks(&legacy_array());
        let twice = normalize_feedbacks(&to_values(&once));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_first_element_decides_shape() {
        let mut raw = grouped_array();
        raw.push(json!({
            "id": "legacy-in-grouped",
            "targetType": "headerField",
            "targetPath": "Total",
            "feedbackText": "x"
        }));

        let groups = normalize_feedbacks(&raw);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[2].id, "legacy-in-grouped");
        assert!(groups[2].feedback_items.is_empty());
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let raw = vec![
            json!({"id": "fb-1", "targetType": "headerField", "targetPath": "A", "feedbackText": "ok"}),
            json!("not an object"),
            json!(["fb-2", "headerField"]),
            json!(null),
        ];

        let groups = normalize_feedbacks(&raw);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "fb-1");
    }

    #[test]
    fn test_loosely_typed_legacy_fields_are_kept() {
        let raw = vec![
            json!({
                "id": "fb-date",
                "targetType": "headerField",
                "targetPath": "Total",
                "feedbackText": "Include tax",
                "createdAt": "2024-01-10"
            }),
            json!({
                "id": "fb-doc",
                "document": {"fileName": "invoice.pdf", "mimeType": "application/pdf"},
                "targetType": "headerField",
                "targetPath": "Vendor",
                "feedbackText": "Use the legal name"
            }),
            json!({
                "id": "fb-epoch",
                "targetType": "tableColumn",
                "targetPath": "Lines.Amount",
                "feedbackText": "Net of discount",
                "createdAt": 1704844800000u64,
                "embedding": "pending"
            }),
        ];

        let groups = normalize_feedbacks(&raw);
        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();

        assert_eq!(ids, vec!["fb-date", "fb-doc", "fb-epoch"]);

        let midnight = "2024-01-10T00:00:00Z".parse::<chrono::DateTime<Utc>>().unwrap();
        assert_eq!(groups[0].created_at, midnight);
        assert_eq!(groups[2].created_at, midnight);
        assert!(groups[2].embedding.is_none());

        let document = groups[1].document.as_ref().unwrap();
        assert_eq!(document.file_name, "invoice.pdf");
        assert_eq!(groups[1].feedback_items[0].feedback_text, "Use the legal name");
    }

    #[test]
    fn test_grouped_entry_with_loose_fields_is_kept() {
        let raw = vec![json!({
            "id": "g1",
            "documentId": "doc-1",
            "document": {"fileName": "a.pdf"},
            "feedbackItems": [
                {"id": "i1", "targetPath": "Total", "feedbackText": "Net", "createdAt": "2024-01-10"},
                "garbage"
            ],
            "createdAt": 1704844800000u64,
            "updatedAt": "not a date"
        })];

        let groups = normalize_feedbacks(&raw);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].feedback_items.len(), 1);
        assert_eq!(groups[0].feedback_items[0].id, "i1");
    }
}
