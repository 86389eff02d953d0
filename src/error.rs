//! Error types for the docrank library.

use std::io;
use thiserror::Error;

/// Result type alias for docrank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document analysis and ranking.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reported by a block source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A document yielded zero usable text blocks (corrupt, empty, or image-only).
    #[error("Extraction failure for '{document}': {reason}")]
    ExtractionFailure {
        /// Identifier of the failing document.
        document: String,
        /// Why no usable blocks could be produced.
        reason: String,
    },

    /// Invalid run configuration. Fatal; surfaced before any document processing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The embedding collaborator failed or returned malformed output.
    #[error("Embedding failure: {0}")]
    Embedding(String),

    /// Error serializing the run output.
    #[error("Output serialization error: {0}")]
    Output(String),
}

impl Error {
    /// Create an extraction failure for a document.
    pub fn extraction(document: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ExtractionFailure {
            document: document.into(),
            reason: reason.into(),
        }
    }
}
