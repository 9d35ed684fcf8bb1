use async_trait::async_trait;
use chrono::Utc;
use futures::{stream, StreamExt};
use loomcore::WorkflowDraft;
use loommonitor::{
    Execution, ExecutionId, ExecutionService, ExecutionStatus, LogLevel, ServiceError,
    StatusEvent, StatusStream,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

const EVENT_PACING_MS: u64 = 150;

/// In-process stand-in for the execution runner, used by `loom test` so a
/// monitored run can be demonstrated without the real service. Walks the
/// progress milestones and completes with an echo of the input.
pub struct SimulatedRunner {
    executions: Mutex<HashMap<ExecutionId, Execution>>,
    scripts: Mutex<HashMap<ExecutionId, Vec<StatusEvent>>>,
}

impl SimulatedRunner {
    pub fn new() -> Self {
        Self {
            executions: Mutex::new(HashMap::new()),
            scripts: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for SimulatedRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionService for SimulatedRunner {
    async fn create(
        &self,
        draft: WorkflowDraft,
        input_data: serde_json::Value,
    ) -> Result<ExecutionId, ServiceError> {
        let id = Uuid::new_v4();
        let workflow_id = draft.id.unwrap_or_else(Uuid::new_v4);

        let mut events = vec![
            StatusEvent::Started,
            StatusEvent::Log {
                level: LogLevel::Info,
                message: format!("Running '{}' ({} steps)", draft.name, draft.steps.len()),
            },
        ];
        for progress in [25.0, 50.0, 75.0] {
            events.push(StatusEvent::Progress { progress });
        }
        events.push(StatusEvent::Completed {
            output_data: json!({
                "workflow": draft.name,
                "steps_completed": draft.steps.len(),
                "input": input_data,
            }),
        });

        self.scripts.lock().unwrap().insert(id, events);
        self.executions.lock().unwrap().insert(
            id,
            Execution {
                id,
                workflow_id,
                status: ExecutionStatus::Pending,
                input_data,
                output_data: None,
                error_message: None,
                started_at: Utc::now(),
                completed_at: None,
                duration_ms: None,
                logs: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn read(&self, execution_id: ExecutionId) -> Result<Execution, ServiceError> {
        self.executions
            .lock()
            .unwrap()
            .get(&execution_id)
            .cloned()
            .ok_or(ServiceError::NotFound(execution_id))
    }

    async fn subscribe(&self, execution_id: ExecutionId) -> Result<StatusStream, ServiceError> {
        let events = self
            .scripts
            .lock()
            .unwrap()
            .get(&execution_id)
            .cloned()
            .ok_or(ServiceError::NotFound(execution_id))?;
        let paced = stream::iter(events).then(|event| async move {
            sleep(Duration::from_millis(EVENT_PACING_MS)).await;
            event
        });
        Ok(paced.boxed())
    }
}
