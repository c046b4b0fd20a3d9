//! Infer command - runs extraction on a document through the provider

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use super::{bootstrap, print_json, read_json};
use crate::domain::envelope::DocumentRef;
use crate::domain::extractor::{Extractor, ExtractorRepository};
use crate::domain::inference::DocumentUpload;
use crate::infrastructure::blob::InMemoryFeedbackBlobStore;
use crate::infrastructure::extractor::InMemoryExtractorRepository;
use crate::infrastructure::provider::{HttpClient, OpenAiDocumentProvider};
use crate::infrastructure::services::{InferenceConfig, InferenceProviders, InferenceService};

/// Arguments for the infer command
#[derive(Args, Clone)]
pub struct InferArgs {
    /// Extractor JSON file (schema plus stored feedback)
    #[arg(long)]
    pub extractor: PathBuf,

    /// Document to extract from (PDF or image)
    #[arg(long)]
    pub document: PathBuf,

    /// Mime type of the document; guessed from the file name when omitted
    #[arg(long)]
    pub mime_type: Option<String>,
}

/// Run the infer command
pub async fn run(args: InferArgs) -> anyhow::Result<()> {
    let config = bootstrap();

    let extractor: Extractor = read_json(&args.extractor)?;
    let bytes = std::fs::read(&args.document)
        .with_context(|| format!("Failed to read {}", args.document.display()))?;

    let file_name = args
        .document
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let mut document = DocumentRef::new(file_name.clone(), file_name).with_size(bytes.len() as u64);
    document.mime_type = args.mime_type;

    let provider = OpenAiDocumentProvider::with_base_url(
        HttpClient::new(),
        config.provider.api_key.clone(),
        config.provider.base_url.clone(),
    )
    .with_models(
        config.provider.chat_model.clone(),
        config.provider.embedding_model.clone(),
    );

    let owner_id = extractor.owner_id.clone();
    let extractor_id = extractor.id.clone();

    let repository = Arc::new(InMemoryExtractorRepository::new());
    repository.save(extractor).await?;

    let service = InferenceService::with_config(
        repository,
        Arc::new(InMemoryFeedbackBlobStore::new()),
        InferenceProviders::shared(Arc::new(provider)),
        InferenceConfig::from(&config.inference),
    );

    let outcome = service
        .run_inference(&owner_id, &extractor_id, &DocumentUpload::new(document, bytes))
        .await
        .map_err(|e| match e.raw_output() {
            Some(raw) => anyhow::anyhow!("{}\nRaw provider output:\n{}", e, raw),
            None => anyhow::Error::new(e),
        })?;

    print_json(&outcome)
}
