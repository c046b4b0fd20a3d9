//! Parsing of raw extraction provider output

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::domain::extractor::ExtractionResult;
use crate::domain::DomainError;

/// First Markdown code fence in the text, with an optional language tag
static FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[a-zA-Z0-9_-]*[ \t]*\r?\n?(.*?)\r?\n?```").unwrap()
});

/// Body of the first Markdown code fence, or the trimmed text when there is none
///
/// Providers sometimes wrap the fence in prose, so the fence does not have
/// to start or end the text.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();

    FENCE_PATTERN
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(trimmed)
}

/// Parse provider text into an extraction result
///
/// A JSON `null` or empty payload means the provider produced no result.
/// Anything that is not valid JSON in the declared shape is reported as
/// `DomainError::MalformedOutput` carrying the untouched raw text.
pub fn parse_extraction_output(
    provider: &str,
    raw: &str,
) -> Result<Option<ExtractionResult>, DomainError> {
    let payload = strip_code_fence(raw);

    if payload.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| DomainError::malformed_output(provider, e.to_string(), raw))?;

    if value.is_null() {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| DomainError::malformed_output(provider, e.to_string(), raw))
}
