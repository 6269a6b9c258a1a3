use std::sync::Arc;

use async_trait::async_trait;
use report_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::{load_report, record_progress, save_report};
use crate::analysis::Summarizer;
use crate::models::ReportSummary;

pub struct SummarizeReportTask {
    summarizer: Arc<Summarizer>,
}

impl SummarizeReportTask {
    pub fn new(summarizer: Arc<Summarizer>) -> Self {
        Self { summarizer }
    }
}

#[async_trait]
impl Task for SummarizeReportTask {
    async fn run(&self, context: Context) -> Result<TaskResult> {
        let mut report = load_report(&context).await?;
        record_progress(&mut report, 0.8, "Generating summary...");

        let text = report
            .extracted_text
            .as_deref()
            .ok_or_else(|| GraphError::ContextError("Extracted text not found".to_string()))?;
        let context_chunks = report.context_chunks.clone().unwrap_or_default();

        let result = self.summarizer.generate_summary(text, &context_chunks);
        let document_id = report
            .document_id
            .clone()
            .unwrap_or_else(|| report.id.clone());
        let summary = ReportSummary::new(document_id, result, report.received_at);

        info!(
            report_id = %report.id,
            diseases = ?summary.result.detected_diseases,
            processing_time_secs = summary.processing_time_secs,
            "Summary generated"
        );

        report.summary = Some(summary);
        record_progress(&mut report, 1.0, "Complete!");
        save_report(&context, &report).await?;

        Ok(TaskResult::new_with_status(
            Some(format!("Summary generated for {}", report.filename)),
            NextAction::End,
            Some("Complete!".to_string()),
        ))
    }
}
