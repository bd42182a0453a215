//! Backend document store.
//!
//! The backend receives one document per chunk and performs its own
//! embedding, indexing and storage. This module provides:
//! - The [`DocumentStore`] submission contract
//! - The [`Document`] wire payload
//! - [`HelixClient`], the `HelixDB` HTTP implementation

mod helix;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use helix::{HelixClient, ADD_DOCUMENT_QUERY, HEALTH_QUERY};

use crate::watcher::{Chunk, DocumentMetadata};
use crate::Result;

/// Per-chunk metadata: the file's metadata plus the chunk position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(flatten)]
    pub document: DocumentMetadata,
    /// Zero-based chunk position.
    pub chunk_index: usize,
    /// Number of chunks for the file.
    pub chunk_count: usize,
}

/// A single submission to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub filepath: String,
    pub content: String,
    pub filetype: String,
    pub metadata: ChunkMetadata,
}

impl Document {
    /// Build the submission for one chunk of a file.
    #[must_use]
    pub fn from_chunk(metadata: &DocumentMetadata, chunk: Chunk) -> Self {
        Self {
            filepath: metadata.filepath.clone(),
            content: chunk.content,
            filetype: metadata.filetype.clone(),
            metadata: ChunkMetadata {
                document: metadata.clone(),
                chunk_index: chunk.index,
                chunk_count: chunk.total_count,
            },
        }
    }
}

/// Submission contract of the backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Submit one document.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or answers with an empty result.
    async fn submit(&self, document: &Document) -> Result<()>;

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the backend cannot be reached.
    async fn health_check(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_document_from_chunk() {
        let meta = DocumentMetadata::from_path_at(Path::new("/ws/app.py"), 20, 5);
        let chunk = Chunk {
            content: "def main():".to_string(),
            index: 1,
            total_count: 3,
        };

        let doc = Document::from_chunk(&meta, chunk);

        assert_eq!(doc.filepath, "/ws/app.py");
        assert_eq!(doc.filetype, "py");
        assert_eq!(doc.content, "def main():");
        assert_eq!(doc.metadata.chunk_index, 1);
        assert_eq!(doc.metadata.chunk_count, 3);
    }

    #[test]
    fn test_document_wire_format() {
        let meta = DocumentMetadata::from_path_at(Path::new("/ws/app.py"), 20, 5);
        let doc = Document::from_chunk(
            &meta,
            Chunk {
                content: "x = 1".to_string(),
                index: 0,
                total_count: 1,
            },
        );

        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["filepath"], "/ws/app.py");
        assert_eq!(json["content"], "x = 1");
        assert_eq!(json["metadata"]["filename"], "app.py");
        assert_eq!(json["metadata"]["directory"], "/ws");
        assert_eq!(json["metadata"]["size"], 20);
        assert_eq!(json["metadata"]["indexed_at"], 5);
        assert_eq!(json["metadata"]["chunk_index"], 0);
        assert_eq!(json["metadata"]["chunk_count"], 1);
    }
}
