use std::path::PathBuf;

use thiserror::Error;

/// Failures of the infrastructure around the analysis engine.
///
/// The analysis engine itself never fails; these cover reading, extracting
/// and indexing the report before it is summarized.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid file format '{extension}'. Supported: {supported}")]
    UnsupportedFormat {
        extension: String,
        supported: String,
    },

    #[error("File size {size_mb:.2}MB exceeds {limit_mb}MB limit")]
    FileTooLarge { size_mb: f64, limit_mb: u64 },

    #[error("Failed to extract text from file: {0}")]
    Extraction(String),

    #[error("No text could be extracted from {0}")]
    EmptyText(PathBuf),

    #[error("OCR is not configured: {0}")]
    OcrUnavailable(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
