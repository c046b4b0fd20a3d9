//! In-memory extractor repository implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::extractor::{Extractor, ExtractorRepository};
use crate::domain::feedback::{FeedbackGroup, FeedbackItem};
use crate::domain::DomainError;

type ExtractorKey = (String, String);

fn key(owner_id: &str, extractor_id: &str) -> ExtractorKey {
    (owner_id.to_string(), extractor_id.to_string())
}

/// In-memory implementation of ExtractorRepository, keyed by owner and id
#[derive(Debug, Clone, Default)]
pub struct InMemoryExtractorRepository {
    extractors: Arc<RwLock<HashMap<ExtractorKey, Extractor>>>,
}

impl InMemoryExtractorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with extractors
    pub fn with_extractors(extractors: Vec<Extractor>) -> Self {
        let map = extractors
            .into_iter()
            .map(|e| (key(&e.owner_id, &e.id), e))
            .collect();

        Self {
            extractors: Arc::new(RwLock::new(map)),
        }
    }
}

fn extractor_not_found(owner_id: &str, extractor_id: &str) -> DomainError {
    DomainError::not_found(format!(
        "Extractor '{}' not found for owner '{}'",
        extractor_id, owner_id
    ))
}

fn group_not_found(extractor_id: &str, group_id: &str) -> DomainError {
    DomainError::not_found(format!(
        "Feedback group '{}' not found in extractor '{}'",
        group_id, extractor_id
    ))
}

#[async_trait]
impl ExtractorRepository for InMemoryExtractorRepository {
    async fn get(&self, owner_id: &str, extractor_id: &str) -> Result<Option<Extractor>, DomainError> {
        let extractors = self.extractors.read().await;
        Ok(extractors.get(&key(owner_id, extractor_id)).cloned())
    }

    async fn save(&self, extractor: Extractor) -> Result<Extractor, DomainError> {
        let mut extractors = self.extractors.write().await;
        extractors.insert(key(&extractor.owner_id, &extractor.id), extractor.clone());
        Ok(extractor)
    }

    async fn append_feedback_group(
        &self,
        owner_id: &str,
        extractor_id: &str,
        group: FeedbackGroup,
    ) -> Result<FeedbackGroup, DomainError> {
        let mut extractors = self.extractors.write().await;

        let extractor = extractors
            .get_mut(&key(owner_id, extractor_id))
            .ok_or_else(|| extractor_not_found(owner_id, extractor_id))?;

        if extractor.find_feedback(&group.id).is_some() {
            return Err(DomainError::conflict(format!(
                "Feedback group '{}' already exists",
                group.id
            )));
        }

        extractor.feedbacks.push(group.clone());
        extractor.updated_at = Utc::now();
        Ok(group)
    }

    async fn append_feedback_item(
        &self,
        owner_id: &str,
        extractor_id: &str,
        group_id: &str,
        item: FeedbackItem,
    ) -> Result<FeedbackGroup, DomainError> {
        let mut extractors = self.extractors.write().await;

        let extractor = extractors
            .get_mut(&key(owner_id, extractor_id))
            .ok_or_else(|| extractor_not_found(owner_id, extractor_id))?;

        let group = extractor
            .find_feedback_mut(group_id)
            .ok_or_else(|| group_not_found(extractor_id, group_id))?;

        group.push_item(item);
        let group = group.clone();

        extractor.updated_at = Utc::now();
        Ok(group)
    }

    async fn remove_feedback_group(
        &self,
        owner_id: &str,
        extractor_id: &str,
        group_id: &str,
    ) -> Result<FeedbackGroup, DomainError> {
        let mut extractors = self.extractors.write().await;

        let extractor = extractors
            .get_mut(&key(owner_id, extractor_id))
            .ok_or_else(|| extractor_not_found(owner_id, extractor_id))?;

        let index = extractor
            .feedbacks
            .iter()
            .position(|g| g.id == group_id)
            .ok_or_else(|| group_not_found(extractor_id, group_id))?;

        let removed = extractor.feedbacks.remove(index);
        extractor.updated_at = Utc::now();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extractor::ExtractorSchema;

    fn extractor() -> Extractor {
        Extractor::new("invoices", "owner-1", "Invoices", ExtractorSchema::default())
    }

    fn group(id: &str) -> FeedbackGroup {
        FeedbackGroup::new(id, "doc-1", FeedbackItem::new("field", "Total", "Use net"))
    }

    #[tokio::test]
    async fn test_get_is_scoped_by_owner() {
        let repo = InMemoryExtractorRepository::with_extractors(vec![extractor()]);

        assert!(repo.get("owner-1", "invoices").await.unwrap().is_some());
        assert!(repo.get("owner-2", "invoices").await.unwrap().is_none());
        assert!(repo.get("owner-1", "receipts").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_group_and_item() {
        let repo = InMemoryExtractorRepository::with_extractors(vec![extractor()]);

        repo.append_feedback_group("owner-1", "invoices", group("g1"))
            .await
            .unwrap();
        let updated = repo
            .append_feedback_item(
                "owner-1",
                "invoices",
                "g1",
                FeedbackItem::new("table", "Lines.Amount", "Exclude shipping"),
            )
            .await
            .unwrap();

        assert_eq!(updated.feedback_items.len(), 2);

        let stored = repo.get("owner-1", "invoices").await.unwrap().unwrap();
        assert_eq!(stored.feedbacks.len(), 1);
        assert_eq!(stored.feedbacks[0].feedback_items.len(), 2);
    }

    #[tokio::test]
    async fn test_append_duplicate_group_conflicts() {
        let repo = InMemoryExtractorRepository::with_extractors(vec![extractor()]);
        repo.append_feedback_group("owner-1", "invoices", group("g1"))
            .await
            .unwrap();

        let result = repo
            .append_feedback_group("owner-1", "invoices", group("g1"))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_missing_extractor_or_group_is_not_found() {
        let repo = InMemoryExtractorRepository::with_extractors(vec![extractor()]);

        let result = repo
            .append_feedback_group("owner-1", "missing", group("g1"))
            .await;
        assert!(result.unwrap_err().is_not_found());

        let result = repo
            .append_feedback_item("owner-1", "invoices", "nope", FeedbackItem::new("a", "b", "c"))
            .await;
        assert!(result.unwrap_err().is_not_found());

        let result = repo.remove_feedback_group("owner-1", "invoices", "nope").await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_remove_group() {
        let repo = InMemoryExtractorRepository::with_extractors(vec![
            extractor().with_feedback(group("g1")).with_feedback(group("g2")),
        ]);

        let removed = repo
            .remove_feedback_group("owner-1", "invoices", "g1")
            .await
            .unwrap();

        assert_eq!(removed.id, "g1");
        let stored = repo.get("owner-1", "invoices").await.unwrap().unwrap();
        assert_eq!(stored.feedbacks.len(), 1);
        assert_eq!(stored.feedbacks[0].id, "g2");
    }
}
