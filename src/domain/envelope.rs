//! Document + metadata envelope flowing through workflow nodes

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata bag carried alongside a document
pub type Metadata = Map<String, Value>;

/// Opaque reference to a document owned by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: String,

    pub file_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub size: u64,
}

impl DocumentRef {
    pub fn new(id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            mime_type: None,
            size: 0,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }
}

/// The `{document, metadata}` pair passed between workflow nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub document: Option<DocumentRef>,

    #[serde(default)]
    pub metadata: Metadata,
}

impl Envelope {
    pub fn new(document: Option<DocumentRef>, metadata: Metadata) -> Self {
        Self { document, metadata }
    }

    /// Envelope without a document, e.g. for evaluating rules in isolation
    pub fn from_metadata(metadata: Metadata) -> Self {
        Self {
            document: None,
            metadata,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}
