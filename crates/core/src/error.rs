use thiserror::Error;

/// Failures in the build phase: extraction, chunking, embedding, index build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf extraction failed: {0}")]
    Extraction(String),

    #[error("document has no extractable text: {0}")]
    EmptyContent(String),

    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("index already built: {0}")]
    AlreadyBuilt(String),
}

/// Failures in the query phase: retrieval and answer generation.
#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("vector index is empty: {0}")]
    EmptyIndex(String),

    #[error("pipeline not ready: {0}")]
    Precondition(String),

    #[error("model credential error: {0}")]
    Credential(String),

    #[error("answer generation failed: {0}")]
    Generation(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = BuildError> = std::result::Result<T, E>;
