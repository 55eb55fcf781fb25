use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A loaded document: identity, provenance, and its full extracted text.
/// Created once at ingestion and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub document_id: String,
    pub title: String,
    pub source_path: String,
    pub checksum: String,
    pub ingested_at: DateTime<Utc>,
    pub text: String,
}

/// A contiguous slice of a document's text, the unit of embedding and
/// retrieval. `chunk_index` is the insertion position within the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub chunk_index: usize,
    pub text: String,
}

/// A retrieved chunk with its similarity score and retrieval rank (0-based).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
    pub rank: usize,
}

/// Pipeline configuration. `api_key` is one explicit credential source; the
/// generator falls back to `OPENAI_API_KEY` when it is absent.
#[derive(Debug, Clone)]
pub struct QaConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub api_key: Option<String>,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1_000,
            chunk_overlap: 200,
            top_k: 3,
            api_key: None,
        }
    }
}
