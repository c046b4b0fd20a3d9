//! OpenAI-compatible document provider
//!
//! One adapter backs all three provider seams: summaries and extraction go
//! through chat completions with the document attached as a base64 data URL,
//! embeddings through the embeddings endpoint.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::HttpClientTrait;
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::extractor::{ExtractionResult, ExtractorSchema};
use crate::domain::feedback::ContextFeedbackItem;
use crate::domain::inference::{parse_extraction_output, DocumentSummaryProvider, ExtractionProvider};
use crate::domain::DomainError;

const PROVIDER_NAME: &str = "openai";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

const SUMMARY_PROMPT: &str = "Summarize this document in a few sentences. Describe what kind of \
document it is, who issued it and the main information it contains. Reply with plain text only.";

const EXTRACTION_PROMPT: &str = "Extract data from the attached document. Reply with a single JSON \
object of the form {\"headerFields\": [{\"fieldName\": string, \"value\": any}], \"tableTypes\": \
[{\"tableName\": string, \"columns\": [{\"columnName\": string, \"value\": any}]}]} following the \
schema below. Use null for values that are not present. Reply with JSON only.";

/// OpenAI-compatible provider for summaries, embeddings and extraction
#[derive(Debug)]
pub struct OpenAiDocumentProvider<C: HttpClientTrait> {
    client: C,
    auth_header: Option<String>,
    base_url: String,
    chat_model: String,
    embedding_model: String,
}

impl<C: HttpClientTrait> OpenAiDocumentProvider<C> {
    pub fn new(client: C, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    /// Point the provider at another OpenAI-compatible server
    pub fn with_base_url(
        client: C,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: api_key.map(|key| format!("Bearer {}", key)),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_models(
        mut self,
        chat_model: impl Into<String>,
        embedding_model: impl Into<String>,
    ) -> Self {
        self.chat_model = chat_model.into();
        self.embedding_model = embedding_model.into();
        self
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];

        if let Some(ref auth) = self.auth_header {
            headers.push(("Authorization", auth.as_str()));
        }

        headers
    }

    fn build_chat_request(&self, prompt: &str, attachment: Value) -> Value {
        json!({
            "model": self.chat_model,
            "temperature": 0,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    attachment,
                ],
            }],
        })
    }

    async fn chat(&self, body: Value) -> Result<Option<String>, DomainError> {
        let url = self.chat_completions_url();
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        let response: OpenAiChatResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider(PROVIDER_NAME, format!("Failed to parse chat response: {}", e))
        })?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

/// Content part carrying the document inline
fn document_part(bytes: &[u8], mime_type: &str, file_name: &str) -> Value {
    let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes));

    if mime_type.starts_with("image/") {
        json!({ "type": "image_url", "image_url": { "url": data_url } })
    } else {
        json!({ "type": "file", "file": { "filename": file_name, "file_data": data_url } })
    }
}

fn extraction_prompt(
    schema: &ExtractorSchema,
    feedback: &[ContextFeedbackItem],
) -> Result<String, DomainError> {
    let schema = serde_json::to_string_pretty(schema)
        .map_err(|e| DomainError::internal(format!("Failed to serialize schema: {}", e)))?;

    let mut prompt = format!("{}\n\nSchema:\n{}", EXTRACTION_PROMPT, schema);

    if !feedback.is_empty() {
        let feedback = serde_json::to_string_pretty(feedback)
            .map_err(|e| DomainError::internal(format!("Failed to serialize feedback: {}", e)))?;

        prompt.push_str(
            "\n\nCorrections reviewers made on similar documents. Apply them where they fit:\n",
        );
        prompt.push_str(&feedback);
    }

    Ok(prompt)
}

#[async_trait]
impl<C: HttpClientTrait> DocumentSummaryProvider for OpenAiDocumentProvider<C> {
    async fn summarize(
        &self,
        bytes: &[u8],
        mime_type: &str,
        file_name: &str,
    ) -> Result<String, DomainError> {
        let body =
            self.build_chat_request(SUMMARY_PROMPT, document_part(bytes, mime_type, file_name));

        let summary = self.chat(body).await?.unwrap_or_default();
        debug!(file_name, chars = summary.len(), "Document summarized");

        Ok(summary.trim().to_string())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiDocumentProvider<C> {
    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, DomainError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let body = json!({
            "model": self.embedding_model,
            "input": text,
        });

        let url = self.embeddings_url();
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        let response: OpenAiEmbeddingResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider(PROVIDER_NAME, format!("Failed to parse embedding response: {}", e))
        })?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::provider(PROVIDER_NAME, "Embedding response had no data"))?;

        Ok(Some(embedding))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[async_trait]
impl<C: HttpClientTrait> ExtractionProvider for OpenAiDocumentProvider<C> {
    async fn extract(
        &self,
        bytes: &[u8],
        mime_type: &str,
        schema: &ExtractorSchema,
        feedback: &[ContextFeedbackItem],
    ) -> Result<Option<ExtractionResult>, DomainError> {
        let prompt = extraction_prompt(schema, feedback)?;
        let body = self.build_chat_request(&prompt, document_part(bytes, mime_type, "document"));

        match self.chat(body).await? {
            Some(content) => parse_extraction_output(PROVIDER_NAME, &content),
            None => Ok(None),
        }
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

// OpenAI API types

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    embedding: Vec<f32>,
}
