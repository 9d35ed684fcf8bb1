use crate::execution::{Execution, ExecutionId};
use crate::service::{ExecutionService, ServiceError};
use crate::view::ExecutionView;
use futures::StreamExt;
use loomcore::{Variable, WorkflowDraft};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Workflow has no trigger; refusing to start a test run")]
    NotExecutable,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Reconnect policy for the status channel. Applies only to the channel;
/// the execution itself is never retried from the monitor.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
        Duration::from_millis((self.delay_ms as f64 * factor) as u64)
    }
}

/// Handle for one monitored test run.
///
/// `unsubscribe` is fire-and-forget: it stops consuming events but does
/// not ask the service to abort the run.
#[derive(Debug)]
pub struct ExecutionHandle {
    execution_id: ExecutionId,
    view: watch::Receiver<ExecutionView>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ExecutionHandle {
    pub fn execution_id(&self) -> ExecutionId {
        self.execution_id
    }

    /// Watch the live view; `changed()` wakes on every applied event.
    pub fn view(&self) -> watch::Receiver<ExecutionView> {
        self.view.clone()
    }

    pub fn snapshot(&self) -> ExecutionView {
        self.view.borrow().clone()
    }

    pub fn unsubscribe(&self) {
        self.cancel.cancel();
    }

    /// Wait until the monitor stops consuming (terminal event, exhausted
    /// reconnects, or unsubscribe) and return the final view.
    pub async fn settled(self) -> ExecutionView {
        let _ = self.task.await;
        self.view.borrow().clone()
    }
}

/// Starts test runs and keeps their read views current from the status
/// stream. One subscription per execution id; a second `start_test`
/// yields an independent execution and an independent subscription.
pub struct ExecutionMonitor {
    service: Arc<dyn ExecutionService>,
    retry: RetryPolicy,
}

impl ExecutionMonitor {
    pub fn new(service: Arc<dyn ExecutionService>) -> Self {
        Self::with_retry(service, RetryPolicy::default())
    }

    pub fn with_retry(service: Arc<dyn ExecutionService>, retry: RetryPolicy) -> Self {
        Self { service, retry }
    }

    /// Kick off a test run on a snapshot of the draft. Variable defaults
    /// are merged under the supplied input data (explicit input wins),
    /// then the execution is created and its status channel consumed
    /// until a terminal event or the reconnect bound.
    pub async fn start_test(
        &self,
        draft: &WorkflowDraft,
        input_data: serde_json::Value,
    ) -> Result<ExecutionHandle, MonitorError> {
        if draft.triggers.is_empty() {
            return Err(MonitorError::NotExecutable);
        }

        let snapshot = draft.clone();
        let workflow_id = snapshot.id.unwrap_or_else(Uuid::new_v4);
        let input = merge_variable_defaults(&snapshot.variables, input_data);

        let execution_id = self.service.create(snapshot, input).await?;
        tracing::info!("Started test execution {}", execution_id);

        let (tx, rx) = watch::channel(ExecutionView::new(execution_id, workflow_id));
        let cancel = CancellationToken::new();
        let task = tokio::spawn(consume_status(
            Arc::clone(&self.service),
            execution_id,
            tx,
            cancel.clone(),
            self.retry.clone(),
        ));

        Ok(ExecutionHandle {
            execution_id,
            view: rx,
            cancel,
            task,
        })
    }

    /// Fetch the execution resource itself from the service.
    pub async fn fetch(&self, execution_id: ExecutionId) -> Result<Execution, MonitorError> {
        Ok(self.service.read(execution_id).await?)
    }
}

/// Defaults first, explicit input on top. Non-object input is passed
/// through untouched since there is nothing to merge into.
fn merge_variable_defaults(
    variables: &[Variable],
    input_data: serde_json::Value,
) -> serde_json::Value {
    let supplied = match input_data {
        serde_json::Value::Object(map) => map,
        serde_json::Value::Null => serde_json::Map::new(),
        other => return other,
    };
    let mut merged = serde_json::Map::new();
    for variable in variables {
        if !variable.default_value.is_null() {
            merged.insert(variable.name.clone(), variable.default_value.clone());
        }
    }
    for (key, value) in supplied {
        merged.insert(key, value);
    }
    serde_json::Value::Object(merged)
}

async fn consume_status(
    service: Arc<dyn ExecutionService>,
    execution_id: ExecutionId,
    tx: watch::Sender<ExecutionView>,
    cancel: CancellationToken,
    retry: RetryPolicy,
) {
    let mut attempts: u32 = 0;
    'outer: loop {
        let subscribed = tokio::select! {
            _ = cancel.cancelled() => break 'outer,
            result = service.subscribe(execution_id) => result,
        };
        let mut stream = match subscribed {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!("Subscribe failed for {}: {}", execution_id, err);
                if !backoff(&mut attempts, &retry, &tx, &cancel, execution_id).await {
                    break 'outer;
                }
                continue;
            }
        };

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => break 'outer,
                event = stream.next() => event,
            };
            match event {
                Some(event) => {
                    attempts = 0;
                    let mut terminal = false;
                    tx.send_modify(|view| {
                        view.apply(&event);
                        terminal = view.is_terminal();
                    });
                    if terminal {
                        tracing::info!("Execution {} reached a terminal state", execution_id);
                        break 'outer;
                    }
                }
                None => {
                    tracing::warn!(
                        "Status channel for {} closed before a terminal state",
                        execution_id
                    );
                    if !backoff(&mut attempts, &retry, &tx, &cancel, execution_id).await {
                        break 'outer;
                    }
                    break;
                }
            }
        }
    }
}

/// Sleep out the next backoff step. Returns false once the bound is
/// exceeded, after flagging the view; the run itself may well still be
/// alive server-side, so only the channel loss is reported.
async fn backoff(
    attempts: &mut u32,
    retry: &RetryPolicy,
    tx: &watch::Sender<ExecutionView>,
    cancel: &CancellationToken,
    execution_id: ExecutionId,
) -> bool {
    *attempts += 1;
    if *attempts > retry.max_attempts {
        tracing::error!(
            "Giving up on the status channel for {} after {} reconnect attempts",
            execution_id,
            retry.max_attempts
        );
        tx.send_modify(|view| view.connection_lost = true);
        return false;
    }
    let delay = retry.delay_for(*attempts);
    tracing::debug!(
        "Reconnecting status channel for {} in {:?} (attempt {})",
        execution_id,
        delay,
        attempts
    );
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
