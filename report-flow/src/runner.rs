//! FlowRunner – loads a session, executes it and persists the updated session.
//!
//! Services create one runner at startup and share it across requests:
//!
//! ```ignore
//! let result = state.flow_runner.run(&session_id).await?;
//! ```
//!
//! Use `Graph::execute_session` directly when the intermediate `Session` must be
//! inspected before it is saved.

use std::sync::Arc;

use crate::{
    error::{GraphError, Result},
    graph::{ExecutionResult, Graph},
    storage::SessionStorage,
};

/// Orchestrates the _load → execute → save_ pattern.
#[derive(Clone)]
pub struct FlowRunner {
    graph: Arc<Graph>,
    storage: Arc<dyn SessionStorage>,
}

impl FlowRunner {
    pub fn new(graph: Arc<Graph>, storage: Arc<dyn SessionStorage>) -> Self {
        Self { graph, storage }
    }

    /// Execute the given session from its current task and persist it.
    ///
    /// The session is saved even when a task fails, so callers can inspect the
    /// status message of the step that failed.
    pub async fn run(&self, session_id: &str) -> Result<ExecutionResult> {
        let mut session = self
            .storage
            .get(session_id)
            .await?
            .ok_or_else(|| GraphError::SessionNotFound(session_id.to_string()))?;

        let result = self.graph.execute_session(&mut session).await;

        self.storage.save(session).await?;

        result
    }
}
