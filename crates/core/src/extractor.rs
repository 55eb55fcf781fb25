use crate::error::BuildError;
use lopdf::Document;
use std::path::Path;

/// Reads a document from disk and produces its raw text, pages concatenated
/// in page order. An unreadable or corrupt document is an extraction error; a
/// parseable document with no text yields an empty string.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<String, BuildError>;
}

#[derive(Default)]
pub struct LopdfExtractor;

impl TextExtractor for LopdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, BuildError> {
        let document = Document::load(path).map_err(|error| {
            BuildError::Extraction(format!("{}: {error}", path.display()))
        })?;

        let mut pages = Vec::new();
        for (page_no, _page_id) in document.get_pages() {
            let text = document.extract_text(&[page_no]).map_err(|error| {
                BuildError::Extraction(format!(
                    "{} page {page_no}: {error}",
                    path.display()
                ))
            })?;

            if !text.trim().is_empty() {
                pages.push(text.trim().to_string());
            }
        }

        Ok(pages.join("\n"))
    }
}
