//! Chunk embedding and similarity search over previously ingested reports.

mod embedder;
#[cfg(test)]
mod hashing;
mod store;

use async_trait::async_trait;

pub use embedder::FastEmbedder;
#[cfg(test)]
pub(crate) use hashing::HashingEmbedder;
pub use store::InMemoryVectorStore;

use crate::error::{ReportError, Result};
use crate::models::ChunkMetadata;

/// Width of all-MiniLM-L6-v2 sentence vectors.
pub const EMBEDDING_DIMENSION: usize = 384;

#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input text, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::Embedding("No embedding returned".to_string()))
    }
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store a report's chunks and return the document id they were filed under.
    async fn add_documents(&self, chunks: &[String], metadata: &ChunkMetadata) -> Result<String>;

    /// Contents of the `n_results` most similar chunks, best first.
    async fn query(&self, text: &str, n_results: usize) -> Result<Vec<String>>;

    async fn count(&self) -> usize;
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
