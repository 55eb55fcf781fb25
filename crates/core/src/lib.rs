pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod index;
pub mod ingest;
pub mod models;
pub mod orchestrator;

pub use chunking::{chunk_text, ChunkingConfig};
pub use embeddings::{CharacterNgramEmbedder, Embedder, DEFAULT_EMBEDDING_DIMENSIONS};
pub use error::{AnswerError, BuildError};
pub use extractor::{LopdfExtractor, TextExtractor};
pub use generator::{
    build_prompt, resolve_api_key, AnswerGenerator, GeneratorConfig, OpenAiGenerator,
    API_KEY_ENV_VAR, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
pub use index::{InMemoryIndex, VectorIndex};
pub use ingest::load_document;
pub use models::{Document, DocumentChunk, QaConfig, ScoredChunk};
pub use orchestrator::{BuildReport, PipelineState, QaPipeline};
