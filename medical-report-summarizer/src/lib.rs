pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod retrieval;
pub mod service;
pub mod tasks;
pub mod telemetry;
pub mod workflow;

pub use analysis::{KnowledgeBase, Summarizer};
pub use config::SummarizerConfig;
pub use error::{ReportError, Result};
pub use models::*;
pub use service::{AppState, build_router, create_app};
pub use workflow::{ReportComponents, build_report_workflow, create_flow_runner, create_report_session};
