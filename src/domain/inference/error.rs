//! Inference error types

use thiserror::Error;

use crate::domain::DomainError;

/// Errors reported by the inference use cases
///
/// Each kind is distinct so callers can pick their own retry and messaging
/// policy; nothing is retried inside the engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InferenceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported input type: {0}")]
    UnsupportedInputType(String),

    #[error("Provider error in {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("Timeout in stage '{stage}' after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },

    #[error("Malformed provider output: {message}")]
    MalformedOutput { message: String, raw: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl InferenceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unsupported_input_type(mime_type: impl Into<String>) -> Self {
        Self::UnsupportedInputType(mime_type.into())
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn timeout(stage: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            stage: stage.into(),
            timeout_ms,
        }
    }

    pub fn malformed_output(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedOutput {
            message: message.into(),
            raw: raw.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Map a provider failure raised during `stage`
    pub fn from_provider(stage: &str, error: DomainError) -> Self {
        match error {
            DomainError::MalformedOutput { message, raw, .. } => Self::malformed_output(message, raw),
            DomainError::Provider { provider, message } => Self::provider(provider, message),
            other => Self::provider(stage, other.to_string()),
        }
    }

    /// Map a repository or blob store failure
    pub fn from_storage(error: DomainError) -> Self {
        match error {
            DomainError::NotFound { message } => Self::NotFound(message),
            other => Self::Storage(other.to_string()),
        }
    }

    /// Raw provider text attached to a malformed-output error
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::MalformedOutput { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
