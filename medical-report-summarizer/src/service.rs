use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Request, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    middleware::{Next, from_fn},
    response::{Json, Response},
    routing::{get, post},
};
use report_flow::{FlowRunner, Graph, InMemorySessionStorage, Session, SessionStorage};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::{
    analysis::Summarizer,
    config::SummarizerConfig,
    error::ReportError,
    models::{AnalyzeReportRequest, MedicalReport, SessionResponse, SummarizeTextRequest},
    tasks::REPORT_KEY,
    workflow::{ReportComponents, build_report_workflow, create_flow_runner, create_report_session},
};

const WORKFLOW_ERROR_KEY: &str = "workflow_error";
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "session_id": id
        })),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn unprocessable_error(session_id: &str, details: &str) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "session_id": session_id,
            "status": "failed",
            "error": "Report processing failed",
            "details": details
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<Graph>,
    pub session_storage: Arc<dyn SessionStorage>,
    pub flow_runner: FlowRunner,
    pub summarizer: Arc<Summarizer>,
}

impl AppState {
    pub fn new(config: &SummarizerConfig, components: ReportComponents) -> Self {
        let graph = Arc::new(build_report_workflow(config, &components));
        let session_storage: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
        let flow_runner = create_flow_runner(graph.clone(), session_storage.clone());

        Self {
            graph,
            session_storage,
            flow_runner,
            summarizer: components.summarizer,
        }
    }
}

pub async fn create_app(config: &SummarizerConfig) -> Result<Router, ReportError> {
    let components = ReportComponents::from_config(config).await?;
    Ok(build_router(AppState::new(config, components)))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/reports/analyze", post(analyze_report))
        .route("/reports/summarize", post(summarize_text))
        .route("/reports/{session_id}", get(get_session_status))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(correlation_id_middleware))
        .with_state(app_state)
}

/// Tags every request with a correlation id and runs it inside a span
/// carrying that id.
async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&correlation_id).ok();

    if let Some(value) = &header {
        request
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, value.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Medical Report Summarizer",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Rule-based medical report summarization with retrieval of related report passages",
        "endpoints": {
            "POST /reports/analyze": "Process a report file and return its summary",
            "GET /reports/{session_id}": "Get processing status and summary",
            "POST /reports/summarize": "Summarize raw report text",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn analyze_report(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeReportRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload.map_err(|e| bad_request_error(&e.body_text()))?;

    if request.file_path.trim().is_empty() {
        return Err(bad_request_error("file_path is required"));
    }
    info!(file_path = %request.file_path, "Starting report analysis");

    let session = create_report_session(&state.graph, request.file_path.clone())
        .await
        .map_err(|e| internal_error("Failed to create analysis session", &e.to_string()))?;
    let session_id = session.id.clone();

    save_session(&state, session).await?;
    run_workflow(&state, &session_id).await
}

async fn save_session(state: &AppState, session: Session) -> Result<(), ApiError> {
    state.session_storage.save(session).await.map_err(|e| {
        error!("Failed to create session: {}", e);
        internal_error("Failed to create analysis session", &e.to_string())
    })
}

async fn run_workflow(state: &AppState, session_id: &str) -> ApiResult<Value> {
    match state.flow_runner.run(session_id).await {
        Ok(result) => {
            info!(%session_id, status = ?result.status, "Workflow finished");

            let report = load_report(state, session_id).await;
            Ok(Json(json!({
                "session_id": session_id,
                "status": "completed",
                "summary": report.and_then(|report| report.summary)
            })))
        }
        Err(e) => {
            warn!(%session_id, error = %e, "Workflow failed");
            record_failure(state, session_id, &e.to_string()).await;
            Err(unprocessable_error(session_id, &e.to_string()))
        }
    }
}

async fn load_report(state: &AppState, session_id: &str) -> Option<MedicalReport> {
    let session = state.session_storage.get(session_id).await.ok().flatten()?;
    session.context.get(REPORT_KEY).await
}

async fn record_failure(state: &AppState, session_id: &str, message: &str) {
    let Ok(Some(session)) = state.session_storage.get(session_id).await else {
        return;
    };

    if let Err(e) = session.context.set(WORKFLOW_ERROR_KEY, message).await {
        error!(%session_id, "Failed to record workflow error: {}", e);
        return;
    }
    if let Err(e) = state.session_storage.save(session).await {
        error!(%session_id, "Failed to save failed session: {}", e);
    }
}

async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SessionResponse> {
    info!("Getting status for session: {}", session_id);

    match state.session_storage.get(&session_id).await {
        Ok(Some(session)) => {
            let report: Option<MedicalReport> = session.context.get(REPORT_KEY).await;
            let workflow_error: Option<String> = session.context.get(WORKFLOW_ERROR_KEY).await;

            let summary = report.as_ref().and_then(|report| report.summary.clone());
            let status = if summary.is_some() {
                "completed"
            } else if workflow_error.is_some() {
                "failed"
            } else {
                "active"
            };

            // Finished sessions hold the whole report text; drop them once read.
            if status != "active" {
                if let Err(e) = state.session_storage.delete(&session_id).await {
                    warn!(%session_id, "Failed to delete finished session: {}", e);
                }
            }

            Ok(Json(SessionResponse {
                session_id: session.id.clone(),
                status: status.to_string(),
                current_task: Some(session.current_task_id.clone()),
                status_message: workflow_error.or(session.status_message.clone()),
                progress: report.as_ref().map_or(0.0, |report| report.progress),
                summary,
            }))
        }
        Ok(None) => Err(not_found_error("Session not found", &session_id)),
        Err(e) => {
            error!("Failed to load session {}: {}", session_id, e);
            Err(internal_error("Failed to load session", &e.to_string()))
        }
    }
}

async fn summarize_text(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeTextRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload.map_err(|e| bad_request_error(&e.body_text()))?;

    let result = state
        .summarizer
        .generate_summary(&request.text, &request.context_chunks);

    Ok(Json(json!(result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::document::DocumentExtractor;
    use crate::retrieval::{HashingEmbedder, InMemoryVectorStore};

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

    fn app() -> Router {
        build_router(AppState::new(&SummarizerConfig::default(), components()))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_status_and_correlation_id() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(CORRELATION_ID_HEADER));
    }

    #[tokio::test]
    async fn summarize_returns_analysis_result() {
        let (status, body) = send(
            app(),
            post_json("/reports/summarize", json!({ "text": "Diagnosis: asthma" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["detected_diseases"], json!(["Asthma"]));
        assert_eq!(body["follow_up_date"], "Follow-up recommended in 1 month");
    }

    #[tokio::test]
    async fn summarize_without_text_is_bad_request() {
        let (status, _) = send(app(), post_json("/reports/summarize", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn analyze_rejects_empty_path() {
        let (status, body) =
            send(app(), post_json("/reports/analyze", json!({ "file_path": "  " }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "file_path is required");
    }

    #[tokio::test]
    async fn failed_workflow_is_unprocessable_and_recorded() {
        let app = app();
        let (status, body) = send(
            app.clone(),
            post_json("/reports/analyze", json!({ "file_path": "/nonexistent/report.txt" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["details"].as_str().unwrap().contains("File not found"));

        let session_id = body["session_id"].as_str().unwrap();
        let (status, session) = send(
            app,
            Request::get(format!("/reports/{session_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["status"], "failed");
        assert!(session["summary"].is_null());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (status, _) = send(
            app(),
            Request::get("/reports/missing").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn analyze_text_report_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visit.txt");
        std::fs::write(&path, "Patient: R. Okafor\nDiagnosis: pneumonia\nFollow-up in 10 days").unwrap();

        let app = app();
        let (status, body) = send(
            app.clone(),
            post_json("/reports/analyze", json!({ "file_path": path.to_string_lossy() })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "completed");
        assert_eq!(body["summary"]["detected_diseases"], json!(["Pneumonia"]));
        assert_eq!(
            body["summary"]["follow_up_date"],
            "Follow-up recommended in 10 day(s)"
        );

        let session_id = body["session_id"].as_str().unwrap();
        let (_, session) = send(
            app,
            Request::get(format!("/reports/{session_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(session["status"], "completed");
        assert_eq!(session["progress"], 1.0);
        assert_eq!(session["status_message"], "Complete!");
    }

    #[tokio::test]
    async fn finished_session_is_removed_after_it_is_read() {
        let state = AppState::new(&SummarizerConfig::default(), components());
        let app = build_router(state.clone());

        let (_, body) = send(
            app.clone(),
            post_json("/reports/analyze", json!({ "file_path": "/nonexistent/report.txt" })),
        )
        .await;
        let session_id = body["session_id"].as_str().unwrap().to_string();
        assert!(state.session_storage.get(&session_id).await.unwrap().is_some());

        let status_request = || {
            Request::get(format!("/reports/{session_id}"))
                .body(Body::empty())
                .unwrap()
        };
        let (status, session) = send(app.clone(), status_request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["status"], "failed");

        assert!(state.session_storage.get(&session_id).await.unwrap().is_none());
        let (status, _) = send(app, status_request()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn active_session_is_kept_after_it_is_read() {
        let state = AppState::new(&SummarizerConfig::default(), components());
        let session = create_report_session(&state.graph, "/tmp/pending.txt".to_string())
            .await
            .unwrap();
        let session_id = session.id.clone();
        state.session_storage.save(session).await.unwrap();

        let (status, body) = send(
            build_router(state.clone()),
            Request::get(format!("/reports/{session_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "active");
        assert!(state.session_storage.get(&session_id).await.unwrap().is_some());
    }
}
