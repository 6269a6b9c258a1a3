use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat};
use pdf2image::{PDF, Pages};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;

use crate::error::{ReportError, Result};

pub const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
const OCR_MAX_TOKENS: u32 = 4000;

/// Transcribes page images with a vision model behind OpenRouter.
#[derive(Debug, Clone)]
pub struct VisionOcr {
    client: Client,
    api_key: String,
    model: String,
}

impl VisionOcr {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// PDF → page images → text
    pub async fn transcribe_pdf(&self, path: &Path) -> Result<String> {
        let images = render_pdf_pages(path).await?;
        if images.is_empty() {
            return Err(ReportError::Extraction(format!(
                "No pages rendered from {}",
                path.display()
            )));
        }
        self.transcribe(&images).await
    }

    pub async fn transcribe_image(&self, path: &Path) -> Result<String> {
        let image = load_image(path).await?;
        self.transcribe(std::slice::from_ref(&image)).await
    }

    /// Send every page in a single request and return the model's transcript.
    pub async fn transcribe(&self, images: &[DynamicImage]) -> Result<String> {
        info!(pages = images.len(), model = %self.model, "Running vision OCR");

        let mut content = vec![json!({
            "type": "text",
            "text": ocr_prompt(images.len()),
        })];
        for image in images {
            content.push(json!({
                "type": "image_url",
                "image_url": {
                    "url": format!("data:image/png;base64,{}", image_to_base64(image)?)
                }
            }));
        }

        let text = self.complete(content).await?;
        info!(chars = text.len(), "Vision OCR completed");
        Ok(text)
    }

    async fn complete(&self, content: Vec<Value>) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": content
                }
            ],
            "max_tokens": OCR_MAX_TOKENS
        });

        let response = self
            .client
            .post(OPENROUTER_ENDPOINT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| ReportError::Extraction(format!("OCR request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ReportError::Extraction(format!(
                "OCR request failed: {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ReportError::Extraction(format!("Invalid OCR response: {e}")))?;

        extract_message_content(&body)
    }
}

fn ocr_prompt(pages: usize) -> String {
    format!(
        "You are a medical document OCR system. I'm providing {pages} page(s) of a medical report. \
         Extract ALL text with exact wording, preserving line breaks, headings and medical terminology. \
         Return ONLY the extracted text without commentary."
    )
}

fn extract_message_content(body: &Value) -> Result<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ReportError::Extraction("Invalid response format from OCR model".to_string()))
}

async fn render_pdf_pages(path: &Path) -> Result<Vec<DynamicImage>> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<Vec<DynamicImage>> {
        let pdf = PDF::from_file(&path)
            .map_err(|e| ReportError::Extraction(format!("Failed to load PDF: {e}")))?;
        let pages = pdf
            .render(Pages::All, None)
            .map_err(|e| ReportError::Extraction(format!("Failed to render PDF pages: {e}")))?;
        info!(pages = pages.len(), "Rendered PDF pages");
        Ok(pages)
    })
    .await
    .map_err(|e| ReportError::Extraction(e.to_string()))?
}

async fn load_image(path: &Path) -> Result<DynamicImage> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<DynamicImage> {
        image::open(&path).map_err(|e| ReportError::Extraction(format!("Failed to decode image: {e}")))
    })
    .await
    .map_err(|e| ReportError::Extraction(e.to_string()))?
}

fn image_to_base64(image: &DynamicImage) -> Result<String> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| ReportError::Extraction(format!("Failed to encode image: {e}")))?;

    Ok(STANDARD.encode(&buffer))
}
