//! In-memory feedback blob store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::inference::{BlobLocation, FeedbackBlobStore};
use crate::domain::DomainError;

const DEFAULT_BUCKET: &str = "feedback-documents";

#[derive(Debug, Clone)]
struct StoredBlob {
    bytes: Vec<u8>,
    mime_type: String,
}

/// Blob store holding documents in memory, under `owner/extractor/feedback/file`
#[derive(Debug, Clone)]
pub struct InMemoryFeedbackBlobStore {
    bucket: String,
    blobs: Arc<RwLock<HashMap<String, StoredBlob>>>,
}

impl InMemoryFeedbackBlobStore {
    pub fn new() -> Self {
        Self::with_bucket(DEFAULT_BUCKET)
    }

    pub fn with_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            blobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Stored bytes and mime type at `path`
    pub async fn get(&self, path: &str) -> Option<(Vec<u8>, String)> {
        let blobs = self.blobs.read().await;
        blobs
            .get(path)
            .map(|b| (b.bytes.clone(), b.mime_type.clone()))
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

impl Default for InMemoryFeedbackBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedbackBlobStore for InMemoryFeedbackBlobStore {
    async fn put(
        &self,
        owner_id: &str,
        extractor_id: &str,
        feedback_id: &str,
        bytes: Vec<u8>,
        file_name: &str,
        mime_type: &str,
    ) -> Result<BlobLocation, DomainError> {
        let path = format!("{}/{}/{}/{}", owner_id, extractor_id, feedback_id, file_name);

        let mut blobs = self.blobs.write().await;
        blobs.insert(
            path.clone(),
            StoredBlob {
                bytes,
                mime_type: mime_type.to_string(),
            },
        );

        debug!(bucket = %self.bucket, path = %path, "Stored feedback document");
        Ok(BlobLocation::new(self.bucket.clone(), path))
    }

    async fn delete(&self, bucket: &str, path: &str) -> Result<(), DomainError> {
        if bucket != self.bucket {
            return Err(DomainError::storage(format!("Unknown bucket '{}'", bucket)));
        }

        let mut blobs = self.blobs.write().await;
        blobs.remove(path);
        Ok(())
    }
}
