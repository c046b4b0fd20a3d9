//! Docflow engine
//!
//! Decision and enrichment nodes for document workflows, plus
//! feedback-steered document extraction:
//! - Typed condition rules over path-addressed metadata
//! - IF / SWITCH routing and SET-VALUE metadata mutation
//! - Feedback corpus migration and similarity ranking
//! - Inference orchestration against summary, embedding and extraction providers

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::DomainError;
