use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Output of the analysis engine for one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary_text: String,
    pub follow_up_date: String,
    pub detected_diseases: Vec<String>,
    pub medications: String,
    pub recovery_time: String,
}

/// A processed report as handed back to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: String,
    /// Identifier the report's chunks were stored under in the vector store
    pub document_id: String,
    #[serde(flatten)]
    pub result: SummaryResult,
    pub processing_time_secs: f64,
    pub generated_at: DateTime<Utc>,
}

impl ReportSummary {
    pub fn new(document_id: String, result: SummaryResult, received_at: DateTime<Utc>) -> Self {
        let generated_at = Utc::now();
        let processing_time_secs =
            (generated_at - received_at).num_milliseconds().max(0) as f64 / 1000.0;

        Self {
            id: Uuid::new_v4().to_string(),
            document_id,
            result,
            processing_time_secs,
            generated_at,
        }
    }
}

/// Working document carried through the processing workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalReport {
    pub id: String,
    pub file_path: String,
    pub filename: String,
    pub received_at: DateTime<Utc>,
    pub extracted_text: Option<String>,
    pub chunk_count: Option<usize>,
    pub document_id: Option<String>,
    pub context_chunks: Option<Vec<String>>,
    pub summary: Option<ReportSummary>,
    pub progress: f32,
}

impl MedicalReport {
    pub fn new(file_path: impl Into<String>) -> Self {
        let file_path = file_path.into();
        let filename = Path::new(&file_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.clone());

        Self {
            id: Uuid::new_v4().to_string(),
            file_path,
            filename,
            received_at: Utc::now(),
            extracted_text: None,
            chunk_count: None,
            document_id: None,
            context_chunks: None,
            summary: None,
            progress: 0.0,
        }
    }
}

/// Metadata attached to every chunk stored for a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub filename: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeReportRequest {
    pub file_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeTextRequest {
    pub text: String,
    #[serde(default)]
    pub context_chunks: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub status: String,
    pub current_task: Option<String>,
    pub status_message: Option<String>,
    pub progress: f32,
    pub summary: Option<ReportSummary>,
}
