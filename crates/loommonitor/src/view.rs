use crate::execution::{ExecutionId, ExecutionLogEntry, ExecutionStatus, StatusEvent};
use chrono::Utc;
use uuid::Uuid;

/// Read-only projection of a running test, folded from status events.
///
/// The displayed progress is monotonic: each incoming value is clamped to
/// [0, 100] and then only ever raises the display, so duplicated or
/// reordered deliveries cannot make the bar jump backwards. Once a
/// terminal event lands, every later event for the execution is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionView {
    pub execution_id: ExecutionId,
    pub workflow_id: Uuid,
    pub status: ExecutionStatus,
    pub progress: f64,
    pub output_data: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub logs: Vec<ExecutionLogEntry>,
    /// Set when the status channel stayed lost past the reconnect bound.
    /// Says nothing about the run itself, which may still be in progress
    /// on the service side.
    pub connection_lost: bool,
}

impl ExecutionView {
    pub fn new(execution_id: ExecutionId, workflow_id: Uuid) -> Self {
        Self {
            execution_id,
            workflow_id,
            status: ExecutionStatus::Pending,
            progress: 0.0,
            output_data: None,
            error_message: None,
            logs: Vec::new(),
            connection_lost: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn apply(&mut self, event: &StatusEvent) {
        if self.status.is_terminal() {
            return;
        }
        match event {
            StatusEvent::Started => {
                self.status = ExecutionStatus::Running;
            }
            StatusEvent::Progress { progress } => {
                self.progress = self.progress.max(progress.clamp(0.0, 100.0));
            }
            StatusEvent::Log { level, message } => {
                self.logs.push(ExecutionLogEntry {
                    timestamp: Utc::now(),
                    level: *level,
                    message: message.clone(),
                });
            }
            StatusEvent::Completed { output_data } => {
                self.status = ExecutionStatus::Completed;
                self.progress = 100.0;
                self.output_data = Some(output_data.clone());
            }
            StatusEvent::Failed { error_message } => {
                self.status = ExecutionStatus::Failed;
                self.error_message = Some(error_message.clone());
            }
        }
    }
}
