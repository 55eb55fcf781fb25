use crate::error::BuildError;
use crate::extractor::TextExtractor;
use crate::models::Document;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

pub fn digest_file(path: &Path) -> Result<String, BuildError> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

fn generate_document_id(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Loads a single PDF into an immutable `Document`: identity from the path,
/// checksum from the bytes, text from the extractor.
pub fn load_document<X: TextExtractor>(
    extractor: &X,
    path: &Path,
) -> Result<Document, BuildError> {
    let checksum = digest_file(path)?;
    let title = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            BuildError::MissingFileName(format!("path missing filename: {}", path.display()))
        })?
        .to_string();

    let text = extractor.extract(path)?;

    Ok(Document {
        document_id: generate_document_id(path),
        title,
        source_path: path.to_string_lossy().to_string(),
        checksum,
        ingested_at: Utc::now(),
        text,
    })
}
