pub mod context;
pub mod error;
pub mod graph;
pub mod runner;
pub mod storage;
pub mod task;

// Re-export commonly used types
pub use context::Context;
pub use error::{GraphError, Result};
pub use graph::{ExecutionResult, ExecutionStatus, Graph, GraphBuilder};
pub use runner::FlowRunner;
pub use storage::{InMemorySessionStorage, Session, SessionStorage};
pub use task::{NextAction, Task, TaskResult};

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StepTask {
        id: String,
        next_action: NextAction,
    }

    impl StepTask {
        fn new(id: &str, next_action: NextAction) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                next_action,
            })
        }
    }

    #[async_trait]
    impl Task for StepTask {
        fn id(&self) -> &str {
            &self.id
        }

        async fn run(&self, context: Context) -> Result<TaskResult> {
            let mut visited: Vec<String> = context.get("visited").await.unwrap_or_default();
            visited.push(self.id.clone());
            context.set("visited", visited).await?;

            Ok(TaskResult::new_with_status(
                Some(format!("{} done", self.id)),
                self.next_action.clone(),
                Some(format!("Ran {}", self.id)),
            ))
        }
    }

    struct PausingTask;

    #[async_trait]
    impl Task for PausingTask {
        fn id(&self) -> &str {
            "pause"
        }

        async fn run(&self, _context: Context) -> Result<TaskResult> {
            Ok(TaskResult::new(
                Some("waiting".to_string()),
                NextAction::WaitForInput,
            ))
        }
    }

    struct FailingTask;

    #[async_trait]
    impl Task for FailingTask {
        async fn run(&self, _context: Context) -> Result<TaskResult> {
            Err(GraphError::TaskExecutionFailed("boom".to_string()))
        }
    }

    fn linear_graph(first: NextAction) -> Graph {
        GraphBuilder::new("test_graph")
            .add_task(StepTask::new("first", first))
            .add_task(StepTask::new("second", NextAction::ContinueAndExecute))
            .add_task(StepTask::new("third", NextAction::End))
            .add_edge("first", "second")
            .add_edge("second", "third")
            .build()
    }

    #[tokio::test]
    async fn continue_and_execute_runs_to_completion() {
        let graph = linear_graph(NextAction::ContinueAndExecute);
        let mut session = Session::new_from_task("s1".to_string(), "first");

        let result = graph.execute_session(&mut session).await.unwrap();

        assert_eq!(result.status, ExecutionStatus::Completed);
        assert_eq!(result.response.as_deref(), Some("third done"));
        assert_eq!(session.current_task_id, "third");
        assert_eq!(session.status_message.as_deref(), Some("Ran third"));

        let visited: Vec<String> = session.context.get("visited").await.unwrap();
        assert_eq!(visited, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn continue_stops_after_one_step() {
        let graph = linear_graph(NextAction::Continue);
        let mut session = Session::new_from_task("s1".to_string(), "first");

        let result = graph.execute_session(&mut session).await.unwrap();

        assert_eq!(result.status, ExecutionStatus::WaitingForInput);
        assert_eq!(session.current_task_id, "second");

        let result = graph.execute_session(&mut session).await.unwrap();
        assert_eq!(result.status, ExecutionStatus::Completed);
    }

    #[tokio::test]
    async fn wait_for_input_keeps_session_on_the_task() {
        let graph = GraphBuilder::new("pause")
            .add_task(Arc::new(PausingTask))
            .add_task(StepTask::new("after", NextAction::End))
            .add_edge("pause", "after")
            .build();
        let mut session = Session::new_from_task("s1".to_string(), "pause");
        session.status_message = Some("stale".to_string());

        for _ in 0..2 {
            let result = graph.execute_session(&mut session).await.unwrap();
            assert_eq!(result.status, ExecutionStatus::WaitingForInput);
            assert_eq!(result.response.as_deref(), Some("waiting"));
            assert_eq!(session.current_task_id, "pause");
        }

        assert_eq!(session.status_message, None);
        assert!(session.context.get::<Vec<String>>("visited").await.is_none());
    }

    #[tokio::test]
    async fn go_to_unknown_task_is_an_error() {
        let graph = GraphBuilder::new("goto")
            .add_task(StepTask::new("only", NextAction::GoTo("missing".to_string())))
            .build();
        let mut session = Session::new_from_task("s1".to_string(), "only");

        let err = graph.execute_session(&mut session).await.unwrap_err();
        assert!(matches!(err, GraphError::TaskNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn first_task_is_start_task_and_default_id_is_type_name() {
        let failing = Arc::new(FailingTask);
        let failing_id = failing.id().to_string();
        assert!(failing_id.ends_with("FailingTask"));

        let graph = GraphBuilder::new("ids")
            .add_task(failing)
            .add_task(StepTask::new("later", NextAction::End))
            .build();

        assert_eq!(graph.start_task_id(), Some(failing_id.as_str()));
        assert!(graph.contains_task("later"));
    }

    #[tokio::test]
    async fn runner_persists_session_even_when_a_task_fails() {
        let failing = Arc::new(FailingTask);
        let failing_id = failing.id().to_string();
        let graph = Arc::new(
            GraphBuilder::new("runner")
                .add_task(StepTask::new("start", NextAction::ContinueAndExecute))
                .add_task(failing)
                .add_edge("start", failing_id.clone())
                .build(),
        );
        let storage = Arc::new(InMemorySessionStorage::new());
        storage
            .save(Session::new_from_task("s1".to_string(), "start"))
            .await
            .unwrap();

        let runner = FlowRunner::new(graph, storage.clone());
        let err = runner.run("s1").await.unwrap_err();
        assert!(matches!(err, GraphError::TaskExecutionFailed(_)));

        let saved = storage.get("s1").await.unwrap().unwrap();
        assert_eq!(saved.current_task_id, failing_id);
        assert_eq!(saved.status_message.as_deref(), Some("Ran start"));
    }

    #[tokio::test]
    async fn runner_reports_missing_session() {
        let graph = Arc::new(linear_graph(NextAction::End));
        let runner = FlowRunner::new(graph, Arc::new(InMemorySessionStorage::new()));

        let err = runner.run("nope").await.unwrap_err();
        assert!(matches!(err, GraphError::SessionNotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn session_storage_round_trip() {
        let storage = InMemorySessionStorage::new();
        assert!(storage.is_empty());

        let session = Session::new_from_task("session1".to_string(), "task1");
        session.context.set("key", "value").await.unwrap();
        storage.save(session).await.unwrap();

        let retrieved = storage.get("session1").await.unwrap().unwrap();
        assert_eq!(retrieved.current_task_id, "task1");
        assert_eq!(retrieved.context.get::<String>("key").await.as_deref(), Some("value"));

        storage.delete("session1").await.unwrap();
        assert_eq!(storage.len(), 0);
    }
}
