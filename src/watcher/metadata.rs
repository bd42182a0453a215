//! Document metadata derived from a file path.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// File type reported when a path has no usable extension.
pub const UNKNOWN_FILETYPE: &str = "unknown";

/// Metadata attached to every submitted chunk of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Full path of the file.
    pub filepath: String,
    /// Base name of the file.
    pub filename: String,
    /// Lower-cased extension without the dot, or `unknown`.
    pub filetype: String,
    /// Content length in bytes at read time.
    #[serde(rename = "size")]
    pub size_bytes: usize,
    /// Unix timestamp of the read.
    pub indexed_at: i64,
    /// Parent directory of the file.
    pub directory: String,
}

impl DocumentMetadata {
    /// Build metadata for a file read now.
    #[must_use]
    pub fn from_path(path: &Path, size_bytes: usize) -> Self {
        Self::from_path_at(path, size_bytes, chrono::Utc::now().timestamp())
    }

    /// Build metadata with an explicit timestamp.
    #[must_use]
    pub fn from_path_at(path: &Path, size_bytes: usize, indexed_at: i64) -> Self {
        Self {
            filepath: path.to_string_lossy().into_owned(),
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            filetype: filetype(path),
            size_bytes,
            indexed_at,
            directory: path
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// Lower-cased extension of a path, or `unknown`.
#[must_use]
pub fn filetype(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| UNKNOWN_FILETYPE.to_string())
}
