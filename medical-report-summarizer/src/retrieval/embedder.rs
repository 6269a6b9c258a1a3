use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, info};

use super::{EMBEDDING_DIMENSION, Embedder};
use crate::error::{ReportError, Result};

/// Sentence embeddings from all-MiniLM-L6-v2, run locally through fastembed.
///
/// The model is loaded once and shared; inference runs on the blocking pool.
#[derive(Clone)]
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedder {
    /// Load the model, downloading it into the fastembed cache on first use.
    pub async fn try_new() -> Result<Self> {
        let model = tokio::task::spawn_blocking(|| {
            TextEmbedding::try_new(
                InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(true),
            )
        })
        .await
        .map_err(|e| ReportError::Embedding(format!("Embedding model loader stopped: {e}")))?
        .map_err(|e| ReportError::Embedding(format!("Failed to load embedding model: {e}")))?;

        info!(model = "all-MiniLM-L6-v2", "Embedding model loaded");
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.model.clone();
        let input = texts.to_vec();

        let embeddings = tokio::task::spawn_blocking(move || -> Result<Vec<Vec<f32>>> {
            let mut model = model
                .lock()
                .map_err(|_| ReportError::Embedding("Embedding model lock poisoned".to_string()))?;
            model
                .embed(input, None)
                .map_err(|e| ReportError::Embedding(e.to_string()))
        })
        .await
        .map_err(|e| ReportError::Embedding(format!("Embedding worker stopped: {e}")))??;

        debug!(texts = texts.len(), "Texts embedded");
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}
