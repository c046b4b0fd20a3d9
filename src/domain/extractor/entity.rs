//! Extractor aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::schema::ExtractorSchema;
use crate::domain::feedback::{normalize_feedbacks, FeedbackGroup};

/// An extractor: a schema plus the feedback corpus used to steer extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extractor {
    pub id: String,

    pub owner_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub schema: ExtractorSchema,

    /// Feedback groups; legacy flat entries are migrated when read
    #[serde(default, deserialize_with = "deserialize_feedbacks")]
    pub feedbacks: Vec<FeedbackGroup>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn deserialize_feedbacks<'de, D>(deserializer: D) -> Result<Vec<FeedbackGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(normalize_feedbacks(&raw))
}

impl Extractor {
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        name: impl Into<String>,
        schema: ExtractorSchema,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            name: name.into(),
            schema,
            feedbacks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_feedback(mut self, group: FeedbackGroup) -> Self {
        self.feedbacks.push(group);
        self
    }

    /// Feedback groups eligible for similarity ranking
    pub fn embedded_feedback(&self) -> impl Iterator<Item = &FeedbackGroup> {
        self.feedbacks.iter().filter(|g| g.has_embedding())
    }

    pub fn find_feedback(&self, group_id: &str) -> Option<&FeedbackGroup> {
        self.feedbacks.iter().find(|g| g.id == group_id)
    }

    pub fn find_feedback_mut(&mut self, group_id: &str) -> Option<&mut FeedbackGroup> {
        self.feedbacks.iter_mut().find(|g| g.id == group_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feedback::FeedbackItem;
    use serde_json::json;

    #[test]
    fn test_deserialize_migrates_legacy_feedback() {
        let extractor: Extractor = serde_json::from_value(json!({
            "id": "invoices",
            "ownerId": "user-1",
            "name": "Invoices",
            "schema": {"headerFields": [{"fieldName": "Total"}]},
            "feedbacks": [{
                "id": "fb-1",
                "filename": "a.pdf",
                "embedding": [0.5, 0.5],
                "targetType": "headerField",
                "targetPath": "Total",
                "feedbackText": "Use gross"
            }]
        }))
        .unwrap();

        assert_eq!(extractor.feedbacks.len(), 1);
        assert_eq!(extractor.feedbacks[0].document_id, "a.pdf");
        assert_eq!(extractor.feedbacks[0].feedback_items.len(), 1);
    }

    #[test]
    fn test_deserialize_null_feedbacks() {
        let extractor: Extractor = serde_json::from_value(json!({
            "id": "invoices",
            "ownerId": "user-1",
            "feedbacks": null
        }))
        .unwrap();

        assert!(extractor.feedbacks.is_empty());
    }

    #[test]
    fn test_embedded_feedback_filter() {
        let item = || FeedbackItem::new("headerField", "Total", "x");
        let extractor = Extractor::new("e1", "u1", "Invoices", ExtractorSchema::default())
            .with_feedback(FeedbackGroup::new("g1", "d1", item()).with_embedding(vec![1.0]))
            .with_feedback(FeedbackGroup::new("g2", "d2", item()));

        let ids: Vec<&str> = extractor.embedded_feedback().map(|g| g.id.as_str()).collect();

        assert_eq!(ids, vec!["g1"]);
        assert!(extractor.find_feedback("g2").is_some());
        assert!(extractor.find_feedback("missing").is_none());
    }
}
