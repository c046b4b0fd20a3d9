//! Domain layer - Core decision, enrichment and inference logic

pub mod condition;
pub mod embedding;
pub mod envelope;
pub mod error;
pub mod extractor;
pub mod feedback;
pub mod inference;
pub mod node;

pub use condition::{get_path, set_path, ConditionOperator, ConditionRule, DataType};
pub use embedding::{cosine_similarity, EmbeddingProvider};
pub use envelope::{DocumentRef, Envelope, Metadata};
pub use error::DomainError;
pub use extractor::{
    normalize_extraction_result, ExtractionResult, Extractor, ExtractorRepository,
    ExtractorSchema,
};
pub use feedback::{
    normalize_feedbacks, select_top_feedback, ContextFeedbackItem, FeedbackCorrection,
    FeedbackGroup, FeedbackItem,
};
pub use inference::{
    BlobLocation, DocumentSummaryProvider, DocumentUpload, ExtractionProvider, FeedbackBlobStore,
    InferenceError,
};
pub use node::{
    evaluate_if, evaluate_switch, execute_node, validate_node_config, IfConfig, NodeConfig,
    NodeOutcome, SetValueConfig, SwitchConfig,
};
