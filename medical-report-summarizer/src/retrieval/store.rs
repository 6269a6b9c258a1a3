use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Embedder, VectorStore, cosine_similarity};
use crate::error::{ReportError, Result};
use crate::models::ChunkMetadata;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredChunk {
    id: String,
    doc_id: String,
    chunk_index: usize,
    filename: String,
    timestamp: DateTime<Utc>,
    content: String,
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CollectionFile {
    collection: String,
    entries: Vec<StoredChunk>,
}

/// Brute-force vector store with optional JSON persistence.
///
/// With a path, the collection is loaded on [`open`](Self::open) and the
/// whole file is rewritten after every insert.
pub struct InMemoryVectorStore {
    collection: String,
    embedder: Arc<dyn Embedder>,
    entries: RwLock<Vec<StoredChunk>>,
    path: Option<PathBuf>,
}

impl InMemoryVectorStore {
    /// Volatile store; contents are lost when dropped.
    pub fn new(collection: impl Into<String>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            collection: collection.into(),
            embedder,
            entries: RwLock::new(Vec::new()),
            path: None,
        }
    }

    pub async fn open(
        path: impl Into<PathBuf>,
        collection: impl Into<String>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let path = path.into();
        let collection = collection.into();

        let entries = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read(&path).await?;
            let file: CollectionFile = serde_json::from_slice(&raw)?;
            if file.collection != collection {
                return Err(ReportError::Store(format!(
                    "{} holds collection '{}', expected '{}'",
                    path.display(),
                    file.collection,
                    collection
                )));
            }
            info!(collection = %collection, entries = file.entries.len(), "Loaded existing collection");
            file.entries
        } else {
            info!(collection = %collection, path = %path.display(), "Created new collection");
            Vec::new()
        };

        Ok(Self {
            collection,
            embedder,
            entries: RwLock::new(entries),
            path: Some(path),
        })
    }

    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, entries: &[StoredChunk]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = CollectionFile {
            collection: self.collection.clone(),
            entries: entries.to_vec(),
        };
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec(&file)?).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add_documents(&self, chunks: &[String], metadata: &ChunkMetadata) -> Result<String> {
        let doc_id = Uuid::new_v4().to_string();
        let embeddings = self.embedder.embed_batch(chunks).await?;

        if embeddings.len() != chunks.len() {
            return Err(ReportError::Embedding(
                "Chunk count does not match embedding count".to_string(),
            ));
        }

        let mut entries = self.entries.write().await;
        let previous_len = entries.len();

        entries.extend(chunks.iter().zip(embeddings).enumerate().map(
            |(i, (content, embedding))| StoredChunk {
                id: format!("{doc_id}_{i}"),
                doc_id: doc_id.clone(),
                chunk_index: i,
                filename: metadata.filename.clone(),
                timestamp: metadata.timestamp,
                content: content.clone(),
                embedding,
            },
        ));

        if let Err(e) = self.persist(&entries).await {
            entries.truncate(previous_len);
            return Err(e);
        }

        info!(chunks = chunks.len(), %doc_id, "Added chunks to vector store");
        Ok(doc_id)
    }

    async fn query(&self, text: &str, n_results: usize) -> Result<Vec<String>> {
        if n_results == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(text).await?;
        let entries = self.entries.read().await;

        let mut scored: Vec<(f32, &StoredChunk)> = entries
            .iter()
            .map(|entry| (cosine_similarity(&query_embedding, &entry.embedding), entry))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        debug!(candidates = scored.len(), n_results, "Vector store queried");

        Ok(scored
            .into_iter()
            .take(n_results)
            .map(|(_, entry)| entry.content.clone())
            .collect())
    }

    async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}
