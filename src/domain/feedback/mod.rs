//! Feedback domain module
//!
//! Corrections recorded against training documents, the migration of the
//! legacy flat storage shape into groups, and similarity-based selection of
//! the groups relevant to a new document.

mod entity;
mod lenient;
mod normalizer;
mod ranking;

pub use entity::{
    flatten_feedback, ContextFeedbackItem, FeedbackCorrection, FeedbackGroup, FeedbackItem,
    LegacyFeedbackItem, StoredFeedback,
};
pub use normalizer::{is_grouped_shape, normalize_feedbacks};
pub use ranking::{rank_feedback, select_top_feedback, ScoredFeedback, DEFAULT_FEEDBACK_LIMIT};
