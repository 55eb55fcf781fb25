use crate::chunking::{chunk_text, ChunkingConfig};
use crate::embeddings::Embedder;
use crate::error::{AnswerError, BuildError};
use crate::extractor::TextExtractor;
use crate::generator::AnswerGenerator;
use crate::index::{InMemoryIndex, VectorIndex};
use crate::ingest::load_document;
use crate::models::{QaConfig, ScoredChunk};
use std::path::Path;

/// Lifecycle of the pipeline. Transitions are strictly forward; rebuilding
/// requires a new pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Uninitialized,
    IndexBuilt,
    Ready,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub document_id: String,
    pub title: String,
    pub chunk_count: usize,
}

/// Sequences the question-answering pipeline over its collaborators:
/// extract, chunk, and embed into an index once, then per question embed,
/// retrieve, and generate.
pub struct QaPipeline<X, E, G>
where
    X: TextExtractor,
    E: Embedder,
    G: AnswerGenerator,
{
    config: QaConfig,
    extractor: X,
    embedder: E,
    generator: G,
    index: Option<InMemoryIndex>,
    state: PipelineState,
}

impl<X, E, G> QaPipeline<X, E, G>
where
    X: TextExtractor,
    E: Embedder,
    G: AnswerGenerator + Send + Sync,
{
    pub fn new(config: QaConfig, extractor: X, embedder: E, generator: G) -> Self {
        Self {
            config,
            extractor,
            embedder,
            generator,
            index: None,
            state: PipelineState::Uninitialized,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Extracts, chunks, embeds, and indexes the document. Any stage failure
    /// leaves the pipeline `Uninitialized`.
    pub fn build_index(&mut self, path: &Path) -> Result<BuildReport, BuildError> {
        if self.state != PipelineState::Uninitialized {
            return Err(BuildError::AlreadyBuilt(
                "rebuilding requires a new pipeline".to_string(),
            ));
        }

        let document = load_document(&self.extractor, path)?;
        if document.text.trim().is_empty() {
            return Err(BuildError::EmptyContent(document.source_path));
        }

        let chunking = ChunkingConfig {
            chunk_size: self.config.chunk_size,
            chunk_overlap: self.config.chunk_overlap,
        };
        let chunks = chunk_text(&document.text, chunking)?;
        if chunks.is_empty() {
            return Err(BuildError::EmptyContent(document.source_path));
        }

        let texts: Vec<&str> = chunks.iter().map(|chunk| chunk.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts);

        let mut index = InMemoryIndex::new(self.embedder.dimensions());
        index.build(&chunks, &embeddings)?;

        self.index = Some(index);
        self.state = PipelineState::IndexBuilt;

        Ok(BuildReport {
            document_id: document.document_id,
            title: document.title,
            chunk_count: chunks.len(),
        })
    }

    /// Confirms the generator is usable (credential present, endpoint
    /// configured). Failure leaves the pipeline in `IndexBuilt`.
    pub fn init_generator(&mut self) -> Result<(), AnswerError> {
        match self.state {
            PipelineState::Uninitialized => Err(AnswerError::Precondition(
                "build the index before initializing the generator".to_string(),
            )),
            PipelineState::Ready => Err(AnswerError::Precondition(
                "generator is already initialized".to_string(),
            )),
            PipelineState::IndexBuilt => {
                self.generator.validate()?;
                self.state = PipelineState::Ready;
                Ok(())
            }
        }
    }

    /// Top-k chunks for a question, without calling the model. Valid once
    /// the index is built.
    pub fn retrieve(&self, question: &str) -> Result<Vec<ScoredChunk>, AnswerError> {
        if self.state == PipelineState::Uninitialized {
            return Err(AnswerError::Precondition(
                "index has not been built".to_string(),
            ));
        }

        let index = self.index.as_ref().ok_or_else(|| {
            AnswerError::EmptyIndex("index has not been built".to_string())
        })?;
        let query_vector = self.embedder.embed(question);
        index.search(&query_vector, self.config.top_k)
    }

    /// Answers a question from the indexed document. Valid only in `Ready`.
    pub async fn query(&self, question: &str) -> Result<String, AnswerError> {
        if self.state != PipelineState::Ready {
            return Err(AnswerError::Precondition(
                "pipeline must be Ready before answering queries".to_string(),
            ));
        }
        if question.trim().is_empty() {
            return Err(AnswerError::Precondition("question is empty".to_string()));
        }

        let hits = self.retrieve(question)?;
        let context: Vec<String> = hits.into_iter().map(|hit| hit.chunk.text).collect();
        self.generator.answer(question, &context).await
    }
}
