//! Inference service
//!
//! Runs extraction against an extractor, steering the provider with the
//! feedback recorded on the most similar training documents, and grows that
//! feedback corpus.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::InferenceSettings;
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::extractor::{
    normalize_extraction_result, ExtractionResult, Extractor, ExtractorRepository,
};
use crate::domain::feedback::{
    flatten_feedback, rank_feedback, FeedbackCorrection, FeedbackGroup, DEFAULT_FEEDBACK_LIMIT,
};
use crate::domain::inference::{
    DocumentSummaryProvider, DocumentUpload, ExtractionProvider, FeedbackBlobStore,
    InferenceError,
};
use crate::domain::DomainError;

const STAGE_SUMMARY: &str = "summary";
const STAGE_EMBEDDING: &str = "embedding";
const STAGE_EXTRACTION: &str = "extraction";

/// Inference limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceConfig {
    pub provider_timeout_ms: u64,
    pub feedback_limit: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: 60_000,
            feedback_limit: DEFAULT_FEEDBACK_LIMIT,
        }
    }
}

impl From<&InferenceSettings> for InferenceConfig {
    fn from(settings: &InferenceSettings) -> Self {
        Self {
            provider_timeout_ms: settings.provider_timeout_ms,
            feedback_limit: settings.feedback_limit,
        }
    }
}

/// External providers used by the inference chain
#[derive(Debug, Clone)]
pub struct InferenceProviders {
    pub summary: Arc<dyn DocumentSummaryProvider>,
    pub embedding: Arc<dyn EmbeddingProvider>,
    pub extraction: Arc<dyn ExtractionProvider>,
}

impl InferenceProviders {
    /// Use one adapter for all three provider roles
    pub fn shared<P>(provider: Arc<P>) -> Self
    where
        P: DocumentSummaryProvider + EmbeddingProvider + ExtractionProvider + 'static,
    {
        Self {
            summary: provider.clone(),
            embedding: provider.clone(),
            extraction: provider,
        }
    }
}

/// Result of a successful inference run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceOutcome {
    pub extraction: ExtractionResult,
    pub used_feedback_ids: Vec<String>,
    pub document_summary: String,
}

/// Summary and embedding computed for an incoming document
struct DocumentProfile {
    summary: String,
    embedding: Option<Vec<f32>>,
}

/// Inference service orchestrating providers, extractor storage and blob storage
pub struct InferenceService<R: ExtractorRepository, B: FeedbackBlobStore> {
    extractors: Arc<R>,
    blobs: Arc<B>,
    providers: InferenceProviders,
    config: InferenceConfig,
}

impl<R: ExtractorRepository, B: FeedbackBlobStore> std::fmt::Debug for InferenceService<R, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceService")
            .field("providers", &self.providers)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R: ExtractorRepository, B: FeedbackBlobStore> InferenceService<R, B> {
    pub fn new(extractors: Arc<R>, blobs: Arc<B>, providers: InferenceProviders) -> Self {
        Self::with_config(extractors, blobs, providers, InferenceConfig::default())
    }

    pub fn with_config(
        extractors: Arc<R>,
        blobs: Arc<B>,
        providers: InferenceProviders,
        config: InferenceConfig,
    ) -> Self {
        Self {
            extractors,
            blobs,
            providers,
            config,
        }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Extract data from a document with an owner's extractor
    pub async fn run_inference(
        &self,
        owner_id: &str,
        extractor_id: &str,
        upload: &DocumentUpload,
    ) -> Result<InferenceOutcome, InferenceError> {
        let mime_type = upload.supported_mime_type()?;
        let extractor = self.load_extractor(owner_id, extractor_id).await?;

        let profile = self.profile_document(upload, &mime_type).await?;

        let selected: Vec<&FeedbackGroup> = match profile.embedding.as_deref() {
            Some(query) => rank_feedback(extractor.embedded_feedback(), query)
                .into_iter()
                .take(self.config.feedback_limit)
                .inspect(|scored| {
                    debug!(group_id = %scored.group.id, score = scored.score, "Selected feedback");
                })
                .map(|scored| scored.group)
                .collect(),
            None => Vec::new(),
        };

        let used_feedback_ids: Vec<String> = selected.iter().map(|g| g.id.clone()).collect();
        let feedback = flatten_feedback(selected);

        let extraction = self.providers.extraction.as_ref();
        let raw = self
            .bounded(
                STAGE_EXTRACTION,
                extraction.extract(&upload.bytes, &mime_type, &extractor.schema, &feedback),
            )
            .await?;

        if raw.is_none() {
            debug!(extractor_id, "Extraction produced no result, using empty shape");
        }

        info!(
            extractor_id,
            document_id = %upload.document.id,
            feedback_groups = used_feedback_ids.len(),
            feedback_items = feedback.len(),
            "Inference completed"
        );

        Ok(InferenceOutcome {
            extraction: normalize_extraction_result(raw, &extractor.schema),
            used_feedback_ids,
            document_summary: profile.summary,
        })
    }

    /// Record a correction
    ///
    /// When the correction names an existing group the item is appended to it
    /// and `upload` is not used. Otherwise the document is summarized,
    /// embedded and stored, and a new group is created around the correction.
    pub async fn add_feedback(
        &self,
        owner_id: &str,
        extractor_id: &str,
        upload: &DocumentUpload,
        correction: FeedbackCorrection,
    ) -> Result<FeedbackGroup, InferenceError> {
        let extractor = self.load_extractor(owner_id, extractor_id).await?;

        if let Some(group_id) = correction.group_id.clone() {
            if extractor.find_feedback(&group_id).is_none() {
                return Err(InferenceError::not_found(format!(
                    "Feedback group '{}' not found",
                    group_id
                )));
            }

            let group = self
                .extractors
                .append_feedback_item(owner_id, extractor_id, &group_id, correction.into_item())
                .await
                .map_err(InferenceError::from_storage)?;

            info!(extractor_id, group_id = %group.id, items = group.feedback_items.len(), "Feedback appended");
            return Ok(group);
        }

        let mime_type = upload.supported_mime_type()?;
        let profile = self.profile_document(upload, &mime_type).await?;

        let feedback_id = Uuid::new_v4().to_string();
        let location = self
            .blobs
            .put(
                owner_id,
                extractor_id,
                &feedback_id,
                upload.bytes.clone(),
                &upload.document.file_name,
                &mime_type,
            )
            .await
            .map_err(InferenceError::from_storage)?;

        let mut document = upload.document.clone();
        document.mime_type = Some(mime_type);

        let mut group = FeedbackGroup::new(
            feedback_id,
            upload.document.id.clone(),
            correction.into_item(),
        )
        .with_document(document)
        .with_summary(profile.summary)
        .with_storage(location.bucket.clone(), location.path.clone());

        if let Some(embedding) = profile.embedding {
            group = group.with_embedding(embedding);
        }

        match self
            .extractors
            .append_feedback_group(owner_id, extractor_id, group)
            .await
        {
            Ok(group) => {
                info!(extractor_id, group_id = %group.id, "Feedback group created");
                Ok(group)
            }
            Err(e) => {
                self.delete_blob(&location.bucket, &location.path).await;
                Err(InferenceError::from_storage(e))
            }
        }
    }

    /// Delete a feedback group and its stored document
    pub async fn remove_feedback_group(
        &self,
        owner_id: &str,
        extractor_id: &str,
        group_id: &str,
    ) -> Result<FeedbackGroup, InferenceError> {
        let group = self
            .extractors
            .remove_feedback_group(owner_id, extractor_id, group_id)
            .await
            .map_err(InferenceError::from_storage)?;

        if let (Some(bucket), Some(path)) = (&group.storage_bucket, &group.storage_path) {
            self.delete_blob(bucket, path).await;
        }

        info!(extractor_id, group_id, "Feedback group removed");
        Ok(group)
    }

    async fn load_extractor(
        &self,
        owner_id: &str,
        extractor_id: &str,
    ) -> Result<Extractor, InferenceError> {
        self.extractors
            .get(owner_id, extractor_id)
            .await
            .map_err(InferenceError::from_storage)?
            .ok_or_else(|| {
                InferenceError::not_found(format!("Extractor '{}' not found", extractor_id))
            })
    }

    async fn profile_document(
        &self,
        upload: &DocumentUpload,
        mime_type: &str,
    ) -> Result<DocumentProfile, InferenceError> {
        let summarizer = self.providers.summary.as_ref();
        let summary = self
            .bounded(
                STAGE_SUMMARY,
                summarizer.summarize(&upload.bytes, mime_type, &upload.document.file_name),
            )
            .await?;

        let embedder = self.providers.embedding.as_ref();
        let embedding = self.bounded(STAGE_EMBEDDING, embedder.embed(&summary)).await?;

        Ok(DocumentProfile { summary, embedding })
    }

    /// Await a provider call under the configured timeout
    async fn bounded<T, F>(&self, stage: &'static str, call: F) -> Result<T, InferenceError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        let timeout_ms = self.config.provider_timeout_ms;

        match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
            Ok(result) => result.map_err(|e| {
                warn!(stage, error = %e, "Provider call failed");
                InferenceError::from_provider(stage, e)
            }),
            Err(_) => {
                warn!(stage, timeout_ms, "Provider call timed out");
                Err(InferenceError::timeout(stage, timeout_ms))
            }
        }
    }

    async fn delete_blob(&self, bucket: &str, path: &str) {
        if let Err(e) = self.blobs.delete(bucket, path).await {
            warn!(bucket, path, error = %e, "Failed to delete feedback document");
        }
    }
}
