use async_trait::async_trait;
use loomcore::{
    to_workflow_draft, DraftMetadata, GraphModel, NodeCategory, NodeTemplate, Position,
    StoreError, WorkflowDraft, WorkflowStore,
};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory stand-in for the persistence collaborator.
struct MemoryStore {
    drafts: Mutex<HashMap<Uuid, WorkflowDraft>>,
}

impl MemoryStore {
    fn new() -> Self {
        Self {
            drafts: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn create(&self, draft: &WorkflowDraft) -> Result<Uuid, StoreError> {
        let id = draft.id.unwrap_or_else(Uuid::new_v4);
        let mut stored = draft.clone();
        stored.id = Some(id);
        self.drafts.lock().unwrap().insert(id, stored);
        Ok(id)
    }

    async fn update(&self, draft: &WorkflowDraft) -> Result<(), StoreError> {
        let id = draft.id.ok_or(StoreError::MissingId)?;
        let mut drafts = self.drafts.lock().unwrap();
        if !drafts.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        drafts.insert(id, draft.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<WorkflowDraft, StoreError> {
        self.drafts
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }
}

fn sample_draft() -> WorkflowDraft {
    let template = NodeTemplate::new("trigger.manual", "Manual trigger", NodeCategory::Trigger);
    let mut model = GraphModel::new();
    model.add_node(&template, Position::new(0.0, 0.0));
    to_workflow_draft(&model, &DraftMetadata::new("Stored workflow"))
}

#[tokio::test]
async fn create_assigns_an_id_and_get_returns_it() {
    let store = MemoryStore::new();
    let draft = sample_draft();
    assert!(draft.id.is_none());

    let id = store.create(&draft).await.unwrap();
    let loaded = store.get(id).await.unwrap();

    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.name, "Stored workflow");
    assert_eq!(loaded.steps.len(), 1);
}

#[tokio::test]
async fn update_requires_an_existing_id() {
    let store = MemoryStore::new();
    let mut draft = sample_draft();

    assert!(matches!(
        store.update(&draft).await.unwrap_err(),
        StoreError::MissingId
    ));

    draft.id = Some(Uuid::new_v4());
    assert!(matches!(
        store.update(&draft).await.unwrap_err(),
        StoreError::NotFound(_)
    ));

    let id = store.create(&draft).await.unwrap();
    let mut loaded = store.get(id).await.unwrap();
    loaded.name = "Renamed".to_string();
    store.update(&loaded).await.unwrap();
    assert_eq!(store.get(id).await.unwrap().name, "Renamed");
}

#[tokio::test]
async fn get_missing_id_is_not_found() {
    let store = MemoryStore::new();
    let ghost = Uuid::new_v4();

    assert!(matches!(
        store.get(ghost).await.unwrap_err(),
        StoreError::NotFound(id) if id == ghost
    ));
}
