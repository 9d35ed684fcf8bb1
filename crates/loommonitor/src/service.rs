use crate::execution::{Execution, ExecutionId, StatusEvent};
use async_trait::async_trait;
use futures::stream::BoxStream;
use loomcore::WorkflowDraft;
use thiserror::Error;

/// Live status events for one execution id. The stream ends on
/// disconnect; a terminal event is the normal last item.
pub type StatusStream = BoxStream<'static, StatusEvent>;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Execution not found: {0}")]
    NotFound(ExecutionId),

    #[error("Execution service rejected the request: {0}")]
    Rejected(String),

    #[error("Connection to execution service failed: {0}")]
    Connection(String),
}

/// The external execution runner, seen from the editor.
///
/// `create` receives the draft by value: the run works on that snapshot
/// and later edits in the editor cannot reach it.
#[async_trait]
pub trait ExecutionService: Send + Sync {
    async fn create(
        &self,
        draft: WorkflowDraft,
        input_data: serde_json::Value,
    ) -> Result<ExecutionId, ServiceError>;

    async fn read(&self, execution_id: ExecutionId) -> Result<Execution, ServiceError>;

    /// Open one status channel for the execution. Callable again after a
    /// disconnect; a channel opened for a finished execution replays at
    /// least the terminal event.
    async fn subscribe(&self, execution_id: ExecutionId) -> Result<StatusStream, ServiceError>;
}
