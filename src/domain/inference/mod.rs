//! Inference domain - document summary, extraction and feedback storage seams

mod blob_store;
mod error;
mod input;
mod output;
mod provider;

pub use blob_store::{BlobLocation, FeedbackBlobStore};
pub use error::InferenceError;
pub use input::{is_supported_mime_type, DocumentUpload};
pub use output::{parse_extraction_output, strip_code_fence};
pub use provider::{DocumentSummaryProvider, ExtractionProvider};

#[cfg(test)]
pub use blob_store::MockFeedbackBlobStore;
#[cfg(test)]
pub use provider::mock::{MockExtractionProvider, MockSummaryProvider};
