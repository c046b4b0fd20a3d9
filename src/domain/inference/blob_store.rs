//! Blob storage for feedback training documents

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Where a stored blob lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobLocation {
    pub bucket: String,
    pub path: String,
}

impl BlobLocation {
    pub fn new(bucket: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.into(),
        }
    }
}

/// Object storage for the documents behind feedback groups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FeedbackBlobStore: Send + Sync {
    /// Store a training document
    async fn put(
        &self,
        owner_id: &str,
        extractor_id: &str,
        feedback_id: &str,
        bytes: Vec<u8>,
        file_name: &str,
        mime_type: &str,
    ) -> Result<BlobLocation, DomainError>;

    /// Delete a stored document
    async fn delete(&self, bucket: &str, path: &str) -> Result<(), DomainError>;
}
