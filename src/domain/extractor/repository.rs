//! Extractor repository trait

use async_trait::async_trait;

use super::entity::Extractor;
use crate::domain::feedback::{FeedbackGroup, FeedbackItem};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistence for extractors, scoped by owner
///
/// Lookups return `Ok(None)` when the extractor does not exist for the owner;
/// mutations of an absent extractor or group fail with `DomainError::NotFound`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ExtractorRepository: Send + Sync {
    /// Get an extractor owned by `owner_id`
    async fn get(&self, owner_id: &str, extractor_id: &str) -> Result<Option<Extractor>, DomainError>;

    /// Create or replace an extractor
    async fn save(&self, extractor: Extractor) -> Result<Extractor, DomainError>;

    /// Append a new feedback group
    async fn append_feedback_group(
        &self,
        owner_id: &str,
        extractor_id: &str,
        group: FeedbackGroup,
    ) -> Result<FeedbackGroup, DomainError>;

    /// Append an item to an existing feedback group
    async fn append_feedback_item(
        &self,
        owner_id: &str,
        extractor_id: &str,
        group_id: &str,
        item: FeedbackItem,
    ) -> Result<FeedbackGroup, DomainError>;

    /// Remove a feedback group, returning it
    async fn remove_feedback_group(
        &self,
        owner_id: &str,
        extractor_id: &str,
        group_id: &str,
    ) -> Result<FeedbackGroup, DomainError>;
}
