use std::sync::Arc;

use async_trait::async_trait;
use report_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};

use super::{load_report, record_progress, save_report, task_failed};
use crate::retrieval::VectorStore;

const STATUS: &str = "Retrieving relevant context...";

/// Looks up passages similar to the opening of the report.
pub struct RetrieveContextTask {
    store: Arc<dyn VectorStore>,
    n_results: usize,
    query_chars: usize,
}

impl RetrieveContextTask {
    pub fn new(store: Arc<dyn VectorStore>, n_results: usize, query_chars: usize) -> Self {
        Self {
            store,
            n_results,
            query_chars,
        }
    }
}

#[async_trait]
impl Task for RetrieveContextTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let mut report = load_report(&context).await?;
        record_progress(&mut report, 0.7, STATUS);

        let query: String = report
            .extracted_text
            .as_deref()
            .ok_or_else(|| GraphError::ContextError("Extracted text not found".to_string()))?
            .chars()
            .take(self.query_chars)
            .collect();

        let chunks = self
            .store
            .query(&query, self.n_results)
            .await
            .map_err(task_failed)?;

        report.context_chunks = Some(chunks);
        save_report(&context, &report).await?;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::ContinueAndExecute,
            Some(STATUS.to_string()),
        ))
    }
}
