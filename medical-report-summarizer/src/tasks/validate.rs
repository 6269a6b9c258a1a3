use std::path::Path;

use async_trait::async_trait;
use report_flow::{Context, NextAction, Result, Task, TaskResult};

use super::{load_report, record_progress, save_report, task_failed};
use crate::document::validate_file;

const STATUS: &str = "Validating file...";

pub struct ValidateReportTask {
    max_file_size_mb: u64,
}

impl ValidateReportTask {
    pub fn new(max_file_size_mb: u64) -> Self {
        Self { max_file_size_mb }
    }
}

#[async_trait]
impl Task for ValidateReportTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let mut report = load_report(&context).await?;
        record_progress(&mut report, 0.1, STATUS);

        validate_file(Path::new(&report.file_path), self.max_file_size_mb)
            .await
            .map_err(task_failed)?;

        save_report(&context, &report).await?;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::ContinueAndExecute,
            Some(STATUS.to_string()),
        ))
    }
}
