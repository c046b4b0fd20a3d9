//! Documents submitted for inference or feedback

use super::error::InferenceError;
use crate::domain::envelope::DocumentRef;

const PDF_MIME_TYPE: &str = "application/pdf";
const IMAGE_MIME_PREFIX: &str = "image/";

/// Raw document bytes together with their reference
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpload {
    pub document: DocumentRef,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(document: DocumentRef, bytes: Vec<u8>) -> Self {
        Self { document, bytes }
    }

    /// Mime type declared on the reference, or guessed from the file name
    pub fn mime_type(&self) -> Option<String> {
        self.document
            .mime_type
            .as_ref()
            .filter(|m| !m.trim().is_empty())
            .map(|m| m.trim().to_ascii_lowercase())
            .or_else(|| {
                mime_guess::from_path(&self.document.file_name)
                    .first()
                    .map(|m| m.essence_str().to_string())
            })
    }

    /// Resolve the mime type, rejecting anything but PDFs and images
    pub fn supported_mime_type(&self) -> Result<String, InferenceError> {
        let mime_type = self.mime_type().ok_or_else(|| {
            InferenceError::unsupported_input_type(format!(
                "unknown type for '{}'",
                self.document.file_name
            ))
        })?;

        if is_supported_mime_type(&mime_type) {
            Ok(mime_type)
        } else {
            Err(InferenceError::unsupported_input_type(mime_type))
        }
    }
}

/// Whether documents of this mime type can be summarized and extracted
pub fn is_supported_mime_type(mime_type: &str) -> bool {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == PDF_MIME_TYPE
        || (essence.starts_with(IMAGE_MIME_PREFIX) && essence.len() > IMAGE_MIME_PREFIX.len())
}
