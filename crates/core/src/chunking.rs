use crate::error::BuildError;
use crate::models::DocumentChunk;

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1_000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.chunk_size == 0 {
            return Err(BuildError::InvalidChunkConfig(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(BuildError::InvalidChunkConfig(format!(
                "overlap {} must be smaller than chunk_size {}",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    pub fn stride(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }
}

/// Splits `text` into fixed-size chunks where every chunk after the first
/// starts `chunk_overlap` characters before the previous chunk's end. The
/// final chunk may be shorter than `chunk_size`. Empty input yields no
/// chunks; whether that is an error is the build phase's call.
pub fn chunk_text(text: &str, config: ChunkingConfig) -> Result<Vec<DocumentChunk>, BuildError> {
    config.validate()?;

    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + config.chunk_size).min(chars.len());
        chunks.push(DocumentChunk {
            chunk_index: chunks.len(),
            text: chars[start..end].iter().collect(),
        });

        if end == chars.len() {
            break;
        }
        start += config.stride();
    }

    Ok(chunks)
}
