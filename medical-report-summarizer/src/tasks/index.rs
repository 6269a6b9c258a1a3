use std::sync::Arc;

use async_trait::async_trait;
use report_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use tracing::debug;

use super::{load_report, record_progress, save_report, task_failed};
use crate::document::chunk_document;
use crate::models::ChunkMetadata;
use crate::retrieval::VectorStore;

/// Chunks the extracted text and files the chunks in the vector store.
pub struct IndexReportTask {
    store: Arc<dyn VectorStore>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl IndexReportTask {
    pub fn new(store: Arc<dyn VectorStore>, chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            store,
            chunk_size,
            chunk_overlap,
        }
    }
}

#[async_trait]
impl Task for IndexReportTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let mut report = load_report(&context).await?;
        let text = report
            .extracted_text
            .clone()
            .ok_or_else(|| GraphError::ContextError("Extracted text not found".to_string()))?;

        record_progress(&mut report, 0.3, "Chunking document...");
        let chunks = chunk_document(&text, self.chunk_size, self.chunk_overlap);
        debug!(chunks = chunks.len(), "Report chunked");

        record_progress(&mut report, 0.5, "Generating embeddings...");
        let metadata = ChunkMetadata {
            filename: report.filename.clone(),
            timestamp: report.received_at,
        };
        let document_id = self
            .store
            .add_documents(&chunks, &metadata)
            .await
            .map_err(task_failed)?;

        report.chunk_count = Some(chunks.len());
        report.document_id = Some(document_id);
        save_report(&context, &report).await?;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::ContinueAndExecute,
            Some("Generating embeddings...".to_string()),
        ))
    }
}
