//! Document summary and extraction provider traits

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::extractor::{ExtractionResult, ExtractorSchema};
use crate::domain::feedback::ContextFeedbackItem;
use crate::domain::DomainError;

/// Produces a textual summary of a document
///
/// Callers only pass `application/pdf` and `image/*` documents.
#[async_trait]
pub trait DocumentSummaryProvider: Send + Sync + Debug {
    async fn summarize(
        &self,
        bytes: &[u8],
        mime_type: &str,
        file_name: &str,
    ) -> Result<String, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

/// Extracts schema-shaped data from a document
///
/// Returns `Ok(None)` when the provider produced no usable result, and
/// `DomainError::MalformedOutput` (carrying the raw text) when its output
/// could not be parsed.
#[async_trait]
pub trait ExtractionProvider: Send + Sync + Debug {
    async fn extract(
        &self,
        bytes: &[u8],
        mime_type: &str,
        schema: &ExtractorSchema,
        feedback: &[ContextFeedbackItem],
    ) -> Result<Option<ExtractionResult>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
