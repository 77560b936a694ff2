//! Error types for folio.

use crate::bounds::LengthBoundsError;

/// Errors that can occur around segmentation.
///
/// The segmentation stages themselves are total; errors come from reading
/// documents, from the embedding and index collaborators, and from the one
/// checked outcome of a run: a non-empty document that yielded nothing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A non-empty document produced zero units.
    ///
    /// Recoverable: callers should surface it as a warning, not abort.
    #[error("no content extracted from {document}")]
    NoContent {
        /// The document name.
        document: String,
    },

    /// File extension with no registered reader.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Filesystem error while reading a document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The structural page reader failed on a document.
    #[error("page reader error: {0}")]
    Reader(String),

    /// Embedding provider error.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Similarity index error.
    #[error("index error: {0}")]
    Index(String),

    /// Completion provider error.
    #[error("completion error: {0}")]
    Completion(String),

    /// A completion with no usable question list in it.
    #[error("malformed completion: {0}")]
    Response(String),

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid unit length bounds.
    #[error(transparent)]
    Bounds(#[from] LengthBoundsError),
}

impl Error {
    /// Whether the caller can continue with other documents.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoContent { .. })
    }
}

/// Result type for folio operations.
pub type Result<T> = std::result::Result<T, Error>;
