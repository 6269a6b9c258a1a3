//! Workflow steps for processing one report file.
//!
//! Every task reads and writes the shared [`MedicalReport`] under
//! [`REPORT_KEY`] and reports its stage through the session status message.

pub mod extract;
pub mod index;
pub mod retrieve;
pub mod summarize;
pub mod validate;

pub use extract::ExtractTextTask;
pub use index::IndexReportTask;
pub use retrieve::RetrieveContextTask;
pub use summarize::SummarizeReportTask;
pub use validate::ValidateReportTask;

use report_flow::{Context, GraphError};
use tracing::info;

use crate::error::ReportError;
use crate::models::MedicalReport;

pub const REPORT_KEY: &str = "report";

pub(crate) async fn load_report(context: &Context) -> report_flow::Result<MedicalReport> {
    context
        .get(REPORT_KEY)
        .await
        .ok_or_else(|| GraphError::ContextError("Report not found in context".to_string()))
}

pub(crate) async fn save_report(
    context: &Context,
    report: &MedicalReport,
) -> report_flow::Result<()> {
    context.set(REPORT_KEY, report).await
}

pub(crate) fn record_progress(report: &mut MedicalReport, progress: f32, message: &str) {
    report.progress = progress;
    info!(report_id = %report.id, progress, "{message}");
}

pub(crate) fn task_failed(error: ReportError) -> GraphError {
    GraphError::TaskExecutionFailed(error.to_string())
}
