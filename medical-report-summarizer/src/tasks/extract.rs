use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use report_flow::{Context, NextAction, Result, Task, TaskResult};

use super::{load_report, record_progress, save_report, task_failed};
use crate::document::TextExtractor;

const STATUS: &str = "Extracting text...";

pub struct ExtractTextTask {
    extractor: Arc<dyn TextExtractor>,
}

impl ExtractTextTask {
    pub fn new(extractor: Arc<dyn TextExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl Task for ExtractTextTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let mut report = load_report(&context).await?;
        record_progress(&mut report, 0.2, STATUS);

        let text = self
            .extractor
            .extract_text(Path::new(&report.file_path))
            .await
            .map_err(task_failed)?;

        report.extracted_text = Some(text);
        save_report(&context, &report).await?;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::ContinueAndExecute,
            Some(STATUS.to_string()),
        ))
    }
}
