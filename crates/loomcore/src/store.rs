use crate::draft::WorkflowDraft;
use crate::error::StoreError;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence collaborator. The editor core never persists anything on
/// its own; saving is an explicit user action routed through this trait.
///
/// Failures are surfaced to the user as retryable errors; implementations
/// must not retry silently on the caller's behalf.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Persist a new draft and return the id assigned to it.
    async fn create(&self, draft: &WorkflowDraft) -> Result<Uuid, StoreError>;

    /// Overwrite the stored draft with the same id.
    async fn update(&self, draft: &WorkflowDraft) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<WorkflowDraft, StoreError>;
}
