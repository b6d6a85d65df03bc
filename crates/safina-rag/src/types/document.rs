//! Retrieved chunk types with provenance for citations

use serde::{Deserialize, Serialize};

/// Provenance metadata stored with a chunk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Path of the source document, as recorded at ingestion
    pub source: Option<String>,
    /// Page number within the source (paginated formats only)
    pub page: Option<i64>,
}

/// A span of catalog text returned by the retrieval index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Create a chunk
    pub fn new(text: impl Into<String>, source: Option<String>, page: Option<i64>) -> Self {
        Self {
            text: text.into(),
            metadata: ChunkMetadata { source, page },
        }
    }

    /// Final path component of the source, or "unknown"
    pub fn file_name(&self) -> &str {
        self.metadata
            .source
            .as_deref()
            .map(|s| s.rsplit('/').next().unwrap_or(s))
            .unwrap_or("unknown")
    }

    /// Page number as display text, or "n/a"
    pub fn page_label(&self) -> String {
        self.metadata
            .page
            .map(|p| p.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_basename() {
        let chunk = Chunk::new("text", Some("data/catalogs/catalog.pdf".to_string()), Some(2));
        assert_eq!(chunk.file_name(), "catalog.pdf");

        let chunk = Chunk::new("text", Some("care.md".to_string()), None);
        assert_eq!(chunk.file_name(), "care.md");

        let chunk = Chunk::new("text", None, None);
        assert_eq!(chunk.file_name(), "unknown");
    }

    #[test]
    fn test_page_label() {
        assert_eq!(Chunk::new("t", None, Some(3)).page_label(), "3");
        assert_eq!(Chunk::new("t", None, Some(0)).page_label(), "0");
        assert_eq!(Chunk::new("t", None, None).page_label(), "n/a");
    }
}
