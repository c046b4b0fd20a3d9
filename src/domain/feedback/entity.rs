//! Feedback domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lenient;
use crate::domain::envelope::DocumentRef;

/// One correction recorded against a training document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,

    /// Kind of target corrected (e.g. `headerField`, `tableColumn`)
    #[serde(default, deserialize_with = "lenient::text")]
    pub target_type: String,

    /// Path of the corrected field within the extraction result
    #[serde(default, deserialize_with = "lenient::text")]
    pub target_path: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub feedback_text: String,

    #[serde(default = "Utc::now", deserialize_with = "lenient::timestamp_or_now")]
    pub created_at: DateTime<Utc>,
}

impl FeedbackItem {
    pub fn new(
        target_type: impl Into<String>,
        target_path: impl Into<String>,
        feedback_text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            target_type: target_type.into(),
            target_path: target_path.into(),
            feedback_text: feedback_text.into(),
            created_at: Utc::now(),
        }
    }
}

/// A training document together with its accumulated corrections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackGroup {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub document_id: String,

    #[serde(default, deserialize_with = "lenient::document")]
    pub document: Option<DocumentRef>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub document_summary: Option<String>,

    /// Summary embedding; all groups of one extractor share its dimensionality
    #[serde(default, deserialize_with = "lenient::optional")]
    pub embedding: Option<Vec<f32>>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub storage_bucket: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub storage_path: Option<String>,

    #[serde(default, deserialize_with = "lenient::items")]
    pub feedback_items: Vec<FeedbackItem>,

    #[serde(default = "Utc::now", deserialize_with = "lenient::timestamp_or_now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now", deserialize_with = "lenient::timestamp_or_now")]
    pub updated_at: DateTime<Utc>,
}

impl FeedbackGroup {
    /// Create a group holding a single correction
    pub fn new(id: impl Into<String>, document_id: impl Into<String>, item: FeedbackItem) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            document_id: document_id.into(),
            document: None,
            document_summary: None,
            embedding: None,
            storage_bucket: None,
            storage_path: None,
            feedback_items: vec![item],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_document(mut self, document: DocumentRef) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.document_summary = Some(summary.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_storage(mut self, bucket: impl Into<String>, path: impl Into<String>) -> Self {
        self.storage_bucket = Some(bucket.into());
        self.storage_path = Some(path.into());
        self
    }

    /// Whether the group can take part in similarity ranking
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }

    /// Append a correction and bump `updated_at`
    pub fn push_item(&mut self, item: FeedbackItem) {
        self.feedback_items.push(item);
        self.updated_at = Utc::now();
    }
}

/// Flat feedback record written before corrections were grouped per document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyFeedbackItem {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub document_id: Option<String>,

    #[serde(default, alias = "fileName", deserialize_with = "lenient::optional")]
    pub filename: Option<String>,

    #[serde(default, deserialize_with = "lenient::document")]
    pub document: Option<DocumentRef>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub document_summary: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub embedding: Option<Vec<f32>>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub storage_bucket: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional")]
    pub storage_path: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub target_type: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub target_path: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub feedback_text: String,

    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A stored feedback entry in either historical shape
#[derive(Debug, Clone, PartialEq)]
pub enum StoredFeedback {
    Grouped(FeedbackGroup),
    Legacy(LegacyFeedbackItem),
}

/// A correction submitted for a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackCorrection {
    /// Existing group to append to; a new group is created when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    pub target_type: String,

    pub target_path: String,

    pub feedback_text: String,
}

impl FeedbackCorrection {
    pub fn new(
        target_type: impl Into<String>,
        target_path: impl Into<String>,
        feedback_text: impl Into<String>,
    ) -> Self {
        Self {
            group_id: None,
            target_type: target_type.into(),
            target_path: target_path.into(),
            feedback_text: feedback_text.into(),
        }
    }

    pub fn for_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Materialise the correction as a new feedback item
    pub fn into_item(self) -> FeedbackItem {
        FeedbackItem::new(self.target_type, self.target_path, self.feedback_text)
    }
}

/// Feedback item handed to the extraction provider, tagged with its source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextFeedbackItem {
    pub document_id: String,

    #[serde(flatten)]
    pub item: FeedbackItem,
}

/// Flatten groups into a single list of provider context items
pub fn flatten_feedback<'a, I>(groups: I) -> Vec<ContextFeedbackItem>
where
    I: IntoIterator<Item = &'a FeedbackGroup>,
{
    groups
        .into_iter()
        .flat_map(|group| {
            group.feedback_items.iter().map(|item| ContextFeedbackItem {
                document_id: group.document_id.clone(),
                item: item.clone(),
            })
        })
        .collect()
}
