use loomcore::{GraphError, GraphModel, GraphNode, NodeId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyEditorError {
    /// The open buffer has edits that were neither saved nor cancelled.
    /// Callers decide the policy (prompt, auto-save, discard); the editor
    /// only refuses to lose the edits on its own.
    #[error("Unsaved changes on node {0}")]
    UnsavedChanges(NodeId),

    #[error("No node is open for editing")]
    NothingOpen,

    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Clone)]
struct EditBuffer {
    node_id: NodeId,
    seeded_label: String,
    seeded_description: String,
    seeded_config: serde_json::Map<String, serde_json::Value>,
    label: String,
    description: String,
    config: serde_json::Map<String, serde_json::Value>,
    dirty: bool,
}

impl EditBuffer {
    fn seed(node: &GraphNode) -> Self {
        Self {
            node_id: node.id,
            seeded_label: node.data.label.clone(),
            seeded_description: node.data.description.clone(),
            seeded_config: node.data.config.clone(),
            label: node.data.label.clone(),
            description: node.data.description.clone(),
            config: node.data.config.clone(),
            dirty: false,
        }
    }

    fn revert(&mut self) {
        self.label = self.seeded_label.clone();
        self.description = self.seeded_description.clone();
        self.config = self.seeded_config.clone();
        self.dirty = false;
    }
}

/// Per-node configuration form state.
///
/// Clean → Dirty on any field edit; Dirty → Clean on explicit save
/// (committed through `GraphModel::update_node_config`) or explicit
/// cancel (buffer reverts to its seeded values).
#[derive(Debug, Default)]
pub struct PropertyEditor {
    buffer: Option<EditBuffer>,
}

impl PropertyEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the buffer from a node. Refuses to replace a dirty buffer for
    /// a different node; reopening the node already open is a no-op.
    pub fn open(&mut self, node: &GraphNode) -> Result<(), PropertyEditorError> {
        if let Some(buffer) = &self.buffer {
            if buffer.node_id == node.id {
                return Ok(());
            }
            if buffer.dirty {
                return Err(PropertyEditorError::UnsavedChanges(buffer.node_id));
            }
        }
        self.buffer = Some(EditBuffer::seed(node));
        Ok(())
    }

    /// Forced discard: drop any edits and open the given node.
    pub fn discard_and_open(&mut self, node: &GraphNode) {
        self.buffer = Some(EditBuffer::seed(node));
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.as_ref().is_some_and(|b| b.dirty)
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.buffer.as_ref().map(|b| b.node_id)
    }

    pub fn label(&self) -> Option<&str> {
        self.buffer.as_ref().map(|b| b.label.as_str())
    }

    pub fn description(&self) -> Option<&str> {
        self.buffer.as_ref().map(|b| b.description.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.buffer.as_ref().and_then(|b| b.config.get(name))
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        if let Some(buffer) = &mut self.buffer {
            buffer.label = label.into();
            buffer.dirty = true;
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        if let Some(buffer) = &mut self.buffer {
            buffer.description = description.into();
            buffer.dirty = true;
        }
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: serde_json::Value) {
        if let Some(buffer) = &mut self.buffer {
            buffer.config.insert(name.into(), value);
            buffer.dirty = true;
        }
    }

    /// Commit the buffer into the model. The buffer stays open and
    /// becomes the new clean baseline.
    pub fn save(&mut self, model: &mut GraphModel) -> Result<(), PropertyEditorError> {
        let buffer = self.buffer.as_mut().ok_or(PropertyEditorError::NothingOpen)?;
        model.update_node_config(buffer.node_id, &buffer.config)?;
        model.update_node_details(buffer.node_id, buffer.label.clone(), buffer.description.clone())?;
        buffer.seeded_label = buffer.label.clone();
        buffer.seeded_description = buffer.description.clone();
        buffer.seeded_config = buffer.config.clone();
        buffer.dirty = false;
        Ok(())
    }

    /// Discard edits, reverting the buffer to the values it was seeded
    /// with. The node stays open.
    pub fn cancel(&mut self) {
        if let Some(buffer) = &mut self.buffer {
            buffer.revert();
        }
    }

    /// Close the editor, dropping any edits.
    pub fn close(&mut self) {
        self.buffer = None;
    }
}
