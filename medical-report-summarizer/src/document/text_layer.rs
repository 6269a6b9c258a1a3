//! Local text extraction for documents that carry their own text.

use std::path::Path;

use crate::error::{ReportError, Result};

/// Text layer of a PDF. Scanned PDFs come back empty or as an error.
pub async fn read_pdf_text(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;

    tokio::task::spawn_blocking(move || -> Result<String> {
        pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| ReportError::Extraction(format!("PDF text layer: {e}")))
    })
    .await
    .map_err(|e| ReportError::Extraction(format!("PDF reader stopped: {e}")))?
}

/// Paragraph text of a Word document.
pub async fn read_docx_text(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;

    tokio::task::spawn_blocking(move || -> Result<String> {
        docx_lite::extract_text_from_bytes(&bytes)
            .map_err(|e| ReportError::Extraction(format!("DOCX extraction failed: {e}")))
    })
    .await
    .map_err(|e| ReportError::Extraction(format!("DOCX reader stopped: {e}")))?
}
