use loomcore::{EdgeId, GraphModel, NodeId, NodeTemplate, Position};
use serde::{Deserialize, Serialize};

/// Pan/zoom state of the canvas. Pointer coordinates arrive in screen
/// space and are translated into canvas space before they touch the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Viewport {
    pub fn to_canvas(&self, pointer: Position) -> Position {
        Position {
            x: (pointer.x - self.pan_x) / self.zoom,
            y: (pointer.y - self.pan_y) / self.zoom,
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }
}

/// The single active interaction. Starting a new one cancels whatever was
/// in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Idle,
    Dragging {
        template: NodeTemplate,
    },
    Connecting {
        source: NodeId,
        source_handle: String,
    },
}

/// Drives `GraphModel` mutations from canvas gestures.
///
/// Owns the model; rendering layers read it back through `model()`.
/// Selection is single-node and is interaction state, not model state, so
/// it never serializes.
pub struct CanvasController {
    model: GraphModel,
    viewport: Viewport,
    interaction: Interaction,
    selection: Option<NodeId>,
}

impl CanvasController {
    pub fn new(model: GraphModel) -> Self {
        Self {
            model,
            viewport: Viewport::default(),
            interaction: Interaction::Idle,
            selection: None,
        }
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    /// Programmatic access for collaborators that commit through the
    /// model directly, like the property editor.
    pub fn model_mut(&mut self) -> &mut GraphModel {
        &mut self.model
    }

    pub fn into_model(self) -> GraphModel {
        self.model
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    /// Palette drag-start. The template travels with the gesture so the
    /// drop needs no registry lookup.
    pub fn begin_palette_drag(&mut self, template: NodeTemplate) {
        self.interaction = Interaction::Dragging { template };
    }

    /// Drop over the canvas: create the node at the pointer, translated
    /// into canvas space, and select it. Ignored unless a palette drag is
    /// in flight.
    pub fn drop_on_canvas(&mut self, pointer: Position) -> Option<NodeId> {
        let Interaction::Dragging { template } =
            std::mem::replace(&mut self.interaction, Interaction::Idle)
        else {
            return None;
        };
        let position = self.viewport.to_canvas(pointer);
        let id = self.model.add_node(&template, position);
        tracing::debug!("Dropped {} at ({}, {})", template.node_type, position.x, position.y);
        self.selection = Some(id);
        Some(id)
    }

    /// Drag-start from an output handle. Ignored when the node is gone.
    pub fn begin_connection(&mut self, source: NodeId, source_handle: impl Into<String>) -> bool {
        if !self.model.contains_node(source) {
            return false;
        }
        self.interaction = Interaction::Connecting {
            source,
            source_handle: source_handle.into(),
        };
        true
    }

    /// Drop on an input handle. A rejected edge is discarded silently:
    /// the gesture ends and nothing changes in the model, so no visual
    /// artifact can persist.
    pub fn complete_connection(&mut self, target: NodeId) -> Option<EdgeId> {
        let Interaction::Connecting { source, .. } =
            std::mem::replace(&mut self.interaction, Interaction::Idle)
        else {
            return None;
        };
        match self.model.add_edge(source, target, None) {
            Ok(edge_id) => Some(edge_id),
            Err(err) => {
                tracing::debug!("Discarded connection attempt: {}", err);
                None
            }
        }
    }

    /// Abandon whatever gesture is in flight (escape key, pointer leaving
    /// the canvas).
    pub fn cancel_interaction(&mut self) {
        self.interaction = Interaction::Idle;
    }

    /// Single-node selection: selecting replaces any prior selection.
    pub fn select_node(&mut self, id: NodeId) -> bool {
        if !self.model.contains_node(id) {
            return false;
        }
        self.selection = Some(id);
        true
    }

    /// Clicking empty canvas clears the selection.
    pub fn click_empty_canvas(&mut self) {
        self.selection = None;
    }

    /// Delete key. Does nothing while a text input has focus, so typing
    /// backspace into a config field never deletes a node. Removing the
    /// node cascades to its edges and clears the selection.
    pub fn handle_delete_key(&mut self, input_focused: bool) -> Option<NodeId> {
        if input_focused {
            return None;
        }
        let id = self.selection.take()?;
        self.model.remove_node(id);
        tracing::debug!("Deleted node {}", id);
        Some(id)
    }

    /// Remove a node outside the delete-key path (context menu). Keeps
    /// the selection consistent.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        let removed = self.model.remove_node(id);
        if removed && self.selection == Some(id) {
            self.selection = None;
        }
        removed
    }

    /// Move an existing node to the pointer position.
    pub fn drag_node(&mut self, id: NodeId, pointer: Position) -> bool {
        let position = self.viewport.to_canvas(pointer);
        self.model.move_node(id, position).is_ok()
    }

    /// Duplicate the selected node and select the copy.
    pub fn duplicate_selection(&mut self) -> Option<NodeId> {
        let id = self.selection?;
        let copy = self.model.duplicate_node(id).ok()?;
        self.selection = Some(copy);
        Some(copy)
    }
}
