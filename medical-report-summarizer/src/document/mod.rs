//! Report intake: file validation, text extraction and chunking.

mod chunking;
mod ocr;
mod text_layer;

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, warn};

pub use chunking::chunk_document;
pub use ocr::{OPENROUTER_ENDPOINT, VisionOcr};
pub use text_layer::{read_docx_text, read_pdf_text};

use crate::config::SummarizerConfig;
use crate::error::{ReportError, Result};

pub const SUPPORTED_EXTENSIONS: &[&str] = &[".pdf", ".txt", ".docx", ".jpg", ".jpeg", ".png", ".webp"];
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

/// Lowercased extension including the leading dot, or an empty string.
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

fn unsupported(extension: String) -> ReportError {
    ReportError::UnsupportedFormat {
        extension,
        supported: SUPPORTED_EXTENSIONS.join(", "),
    }
}

/// Check that a report file exists, has a supported extension and fits the
/// size limit.
pub async fn validate_file(path: &Path, max_file_size_mb: u64) -> Result<()> {
    if !tokio::fs::try_exists(path).await? {
        return Err(ReportError::FileNotFound(path.to_path_buf()));
    }

    let extension = file_extension(path);
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(unsupported(extension));
    }

    let size_mb = tokio::fs::metadata(path).await?.len() as f64 / (1024.0 * 1024.0);
    if size_mb > max_file_size_mb as f64 {
        return Err(ReportError::FileTooLarge {
            size_mb,
            limit_mb: max_file_size_mb,
        });
    }

    debug!(path = %path.display(), size_mb, "File validated");
    Ok(())
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Reads text, PDF text layers and Word documents locally, and sends scans
/// through OCR when configured.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor {
    ocr: Option<VisionOcr>,
}

impl DocumentExtractor {
    pub fn new(ocr: Option<VisionOcr>) -> Self {
        Self { ocr }
    }

    pub fn from_config(config: &SummarizerConfig) -> Self {
        let ocr = config
            .openrouter_api_key
            .as_ref()
            .map(|key| VisionOcr::new(key.clone(), config.ocr_model.clone()));
        Self::new(ocr)
    }

    fn ocr(&self, extension: &str) -> Result<&VisionOcr> {
        self.ocr.as_ref().ok_or_else(|| {
            ReportError::OcrUnavailable(format!(
                "set OPENROUTER_API_KEY to extract text from {extension} files"
            ))
        })
    }
}

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract_text(&self, path: &Path) -> Result<String> {
        let extension = file_extension(path);

        let text = match extension.as_str() {
            ".txt" => {
                let bytes = tokio::fs::read(path).await?;
                String::from_utf8_lossy(&bytes).into_owned()
            }
            ".pdf" => match read_pdf_text(path).await {
                Ok(text) if !text.trim().is_empty() => text,
                outcome => {
                    match outcome {
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "No readable PDF text layer")
                        }
                        Ok(_) => debug!(path = %path.display(), "PDF has no text layer"),
                    }
                    self.ocr(&extension)?.transcribe_pdf(path).await?
                }
            },
            ".docx" => read_docx_text(path).await?,
            ext if IMAGE_EXTENSIONS.contains(&ext) => {
                self.ocr(&extension)?.transcribe_image(path).await?
            }
            _ => return Err(unsupported(extension)),
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ReportError::EmptyText(path.to_path_buf()));
        }

        info!(path = %path.display(), chars = text.len(), "Text extracted");
        Ok(text)
    }
}
