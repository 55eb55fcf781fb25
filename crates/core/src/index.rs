use crate::error::{AnswerError, BuildError};
use crate::models::{DocumentChunk, ScoredChunk};

/// Stores (embedding, chunk) pairs and serves top-k nearest-neighbor
/// queries. Entries are added in bulk at build time and never removed.
pub trait VectorIndex {
    fn build(
        &mut self,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
    ) -> Result<(), BuildError>;

    /// Returns the `top_k` closest entries by descending similarity, ties
    /// broken by insertion order. `top_k` is clamped to the entry count.
    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>, AnswerError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct IndexEntry {
    embedding: Vec<f32>,
    chunk: DocumentChunk,
}

/// Flat in-memory index scored with cosine similarity. With the default
/// unit-normalized embedder this is equivalent to a dot product.
pub struct InMemoryIndex {
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

impl InMemoryIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            entries: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn cosine_similarity(left: &[f32], right: &[f32]) -> f32 {
    let dot = left
        .iter()
        .zip(right.iter())
        .map(|(a, b)| a * b)
        .sum::<f32>();
    let left_norm = left.iter().map(|value| value * value).sum::<f32>().sqrt();
    let right_norm = right.iter().map(|value| value * value).sum::<f32>().sqrt();

    if left_norm == 0.0 || right_norm == 0.0 {
        return 0.0;
    }
    dot / (left_norm * right_norm)
}

impl VectorIndex for InMemoryIndex {
    fn build(
        &mut self,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
    ) -> Result<(), BuildError> {
        if chunks.len() != embeddings.len() {
            return Err(BuildError::Embedding(format!(
                "embedding count {} doesn't match chunk count {}",
                embeddings.len(),
                chunks.len()
            )));
        }
        if chunks.is_empty() {
            return Err(BuildError::EmptyContent(
                "cannot build an index from zero chunks".to_string(),
            ));
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            if embedding.len() != self.dimensions {
                return Err(BuildError::Embedding(format!(
                    "embedding dimension {} != {}",
                    embedding.len(),
                    self.dimensions
                )));
            }
            entries.push(IndexEntry {
                embedding: embedding.clone(),
                chunk: chunk.clone(),
            });
        }

        self.entries.extend(entries);
        Ok(())
    }

    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>, AnswerError> {
        if self.entries.is_empty() {
            return Err(AnswerError::EmptyIndex(
                "index was queried before any build".to_string(),
            ));
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (position, cosine_similarity(query, &entry.embedding)))
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|left, right| right.1.total_cmp(&left.1));

        Ok(scored
            .into_iter()
            .take(top_k.min(self.entries.len()))
            .enumerate()
            .map(|(rank, (position, score))| ScoredChunk {
                chunk: self.entries[position].chunk.clone(),
                score,
                rank,
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{cosine_similarity, InMemoryIndex, VectorIndex};
    use crate::error::{AnswerError, BuildError};
    use crate::models::DocumentChunk;

    fn chunk(index: usize, text: &str) -> DocumentChunk {
        DocumentChunk {
            chunk_index: index,
            text: text.to_string(),
        }
    }

    #[test]
    fn search_before_build_is_an_empty_index_error() {
        let index = InMemoryIndex::new(3);
        let result = index.search(&[1.0, 0.0, 0.0], 1);
        assert!(matches!(result, Err(AnswerError::EmptyIndex(_))));
    }

    #[test]
    fn build_rejects_mismatched_lengths() {
        let mut index = InMemoryIndex::new(2);
        let result = index.build(&[chunk(0, "a")], &[]);
        assert!(matches!(result, Err(BuildError::Embedding(_))));
    }

    #[test]
    fn build_rejects_zero_chunks() {
        let mut index = InMemoryIndex::new(2);
        let result = index.build(&[], &[]);
        assert!(matches!(result, Err(BuildError::EmptyContent(_))));
    }

    #[test]
    fn build_rejects_wrong_dimensions() {
        let mut index = InMemoryIndex::new(3);
        let result = index.build(&[chunk(0, "a")], &[vec![1.0, 0.0]]);
        assert!(matches!(result, Err(BuildError::Embedding(_))));
    }

    #[test]
    fn an_inserted_embedding_retrieves_its_own_chunk_first() {
        let mut index = InMemoryIndex::new(2);
        index
            .build(
                &[chunk(0, "north"), chunk(1, "east")],
                &[vec![0.0, 1.0], vec![1.0, 0.0]],
            )
            .unwrap();

        let hits = index.search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk.text, "east");
        assert_eq!(hits[0].rank, 0);
    }

    #[test]
    fn top_k_is_clamped_to_entry_count() {
        let mut index = InMemoryIndex::new(2);
        index
            .build(
                &[chunk(0, "a"), chunk(1, "b")],
                &[vec![1.0, 0.0], vec![0.0, 1.0]],
            )
            .unwrap();

        let hits = index.search(&[1.0, 1.0], 10).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn ties_resolve_to_the_first_inserted_entry() {
        let mut index = InMemoryIndex::new(2);
        index
            .build(
                &[chunk(0, "first"), chunk(1, "second"), chunk(2, "third")],
                &[vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]],
            )
            .unwrap();

        let hits = index.search(&[1.0, 0.0], 3).unwrap();
        let texts: Vec<&str> = hits.iter().map(|hit| hit.chunk.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);
    }

    #[test]
    fn zero_query_vector_scores_zero_everywhere() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
