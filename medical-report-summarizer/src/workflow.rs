use std::sync::Arc;

use report_flow::{FlowRunner, Graph, GraphBuilder, GraphError, Session, SessionStorage, Task};
use tracing::info;
use uuid::Uuid;

use crate::analysis::Summarizer;
use crate::config::SummarizerConfig;
use crate::document::{DocumentExtractor, TextExtractor};
use crate::error::Result;
use crate::models::MedicalReport;
use crate::retrieval::{Embedder, FastEmbedder, InMemoryVectorStore, VectorStore};
use crate::tasks::*;

/// Shared services the workflow tasks run against.
#[derive(Clone)]
pub struct ReportComponents {
    pub extractor: Arc<dyn TextExtractor>,
    pub store: Arc<dyn VectorStore>,
    pub summarizer: Arc<Summarizer>,
}

impl ReportComponents {
    /// Wire up the default extractor, embedder and vector store for `config`.
    pub async fn from_config(config: &SummarizerConfig) -> Result<Self> {
        let embedder: Arc<dyn Embedder> = Arc::new(FastEmbedder::try_new().await?);

        let store = match &config.vector_store_path {
            Some(path) => {
                InMemoryVectorStore::open(path, config.collection_name.clone(), embedder).await?
            }
            None => InMemoryVectorStore::new(config.collection_name.clone(), embedder),
        };
        info!(
            collection = %store.collection_name(),
            persisted = store.path().is_some(),
            "Vector store ready"
        );

        Ok(Self {
            extractor: Arc::new(DocumentExtractor::from_config(config)),
            store: Arc::new(store),
            summarizer: Arc::new(Summarizer::default()),
        })
    }
}

pub fn build_report_workflow(config: &SummarizerConfig, components: &ReportComponents) -> Graph {
    let validate_task = Arc::new(ValidateReportTask::new(config.max_file_size_mb));
    let validate_id = validate_task.id().to_string();

    let extract_task = Arc::new(ExtractTextTask::new(components.extractor.clone()));
    let extract_id = extract_task.id().to_string();

    let index_task = Arc::new(IndexReportTask::new(
        components.store.clone(),
        config.chunk_size,
        config.chunk_overlap,
    ));
    let index_id = index_task.id().to_string();

    let retrieve_task = Arc::new(RetrieveContextTask::new(
        components.store.clone(),
        config.context_results,
        config.context_query_chars,
    ));
    let retrieve_id = retrieve_task.id().to_string();

    let summarize_task = Arc::new(SummarizeReportTask::new(components.summarizer.clone()));
    let summarize_id = summarize_task.id().to_string();

    GraphBuilder::new("report_workflow")
        .add_task(validate_task)
        .add_task(extract_task)
        .add_task(index_task)
        .add_task(retrieve_task)
        .add_task(summarize_task)
        .add_edge(&validate_id, &extract_id)
        .add_edge(&extract_id, &index_id)
        .add_edge(&index_id, &retrieve_id)
        .add_edge(&retrieve_id, &summarize_id)
        .build()
}

/// New session positioned at the workflow's first task, with the report in
/// its context.
pub async fn create_report_session(
    graph: &Graph,
    file_path: impl Into<String>,
) -> report_flow::Result<Session> {
    let start_task = graph
        .start_task_id()
        .ok_or_else(|| GraphError::TaskNotFound("start task".to_string()))?;

    let mut session = Session::new_from_task(Uuid::new_v4().to_string(), start_task);
    session.graph_id = graph.id.clone();
    session.context.set(REPORT_KEY, MedicalReport::new(file_path)).await?;

    Ok(session)
}

pub fn create_flow_runner(graph: Arc<Graph>, session_storage: Arc<dyn SessionStorage>) -> FlowRunner {
    FlowRunner::new(graph, session_storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::HashingEmbedder;

    fn components() -> ReportComponents {
        ReportComponents {
            extractor: Arc::new(DocumentExtractor::default()),
            store: Arc::new(InMemoryVectorStore::new(
                "test",
                Arc::new(HashingEmbedder::default()),
            )),
            summarizer: Arc::new(Summarizer::default()),
        }
    }

    #[test]
    fn workflow_starts_with_validation() {
        let graph = build_report_workflow(&SummarizerConfig::default(), &components());

        assert_eq!(graph.start_task_id(), Some(ValidateReportTask::new(1).id()));
        assert!(graph.contains_task(SummarizeReportTask::new(Arc::new(Summarizer::default())).id()));
    }

    #[tokio::test]
    async fn session_carries_a_fresh_report() {
        let graph = build_report_workflow(&SummarizerConfig::default(), &components());
        let session = create_report_session(&graph, "/tmp/discharge.txt").await.unwrap();

        let report: MedicalReport = session.context.get(REPORT_KEY).await.unwrap();
        assert_eq!(report.filename, "discharge.txt");
        assert_eq!(session.current_task_id, graph.start_task_id().unwrap());
        assert_eq!(session.graph_id, "report_workflow");
    }
}
