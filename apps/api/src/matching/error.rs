use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::embedding_client::EmbeddingError;
use crate::matching::loader::DocumentFormat;

/// Which side of a match request an input belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSide {
    Resume,
    JobDescription,
}

impl std::fmt::Display for InputSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSide::Resume => f.write_str("resume"),
            InputSide::JobDescription => f.write_str("job description"),
        }
    }
}

/// Every way a match request can fail. Each kind is distinct so callers can
/// decide per kind whether to retry the whole request.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Unsupported file type: {extension:?} (expected .txt, .pdf, .doc or .docx)")]
    UnsupportedFormat { extension: String },

    #[error("Could not extract text from {format} document: {message}")]
    DocumentParse {
        format: DocumentFormat,
        message: String,
    },

    #[error("I/O error while reading document: {0}")]
    Io(#[from] std::io::Error),

    #[error("{input} text is empty after normalization")]
    EmptyInput { input: InputSide },

    #[error("Embedding provider error: {0}")]
    EmbeddingProvider(#[from] EmbeddingError),

    #[error("Embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Cannot compare a zero-norm embedding vector")]
    DegenerateVector,

    #[error("Invalid band thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Document loader task failed: {0}")]
    LoaderTask(#[from] tokio::task::JoinError),
}
