use serde::{Deserialize, Serialize};

/// Typed metadata attached to a stored portfolio document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document kind, e.g. "project", "experience", "skills"
    #[serde(default)]
    pub kind: Option<String>,
    /// Comma-separated tags
    #[serde(default)]
    pub tags: Option<String>,
    /// Free-form date string as stored alongside the document
    #[serde(default)]
    pub date: Option<String>,
}

/// One similarity-search hit: document text plus its cosine distance to the
/// query. Results are ordered distance-ascending (best match first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub content: String,
    pub metadata: DocumentMetadata,
    pub distance: f64,
}
