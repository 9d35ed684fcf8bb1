use crate::error::{EdgeRejection, GraphError};
use crate::template::{NodeCategory, NodeTemplate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

pub type NodeId = Uuid;
pub type EdgeId = Uuid;

/// Node position on the canvas, in canvas (not pointer) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Everything about a node that the property editor can touch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    pub description: String,
    pub config: serde_json::Map<String, serde_json::Value>,
    pub validation_errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub node_type: String,
    /// Resolved from the registry at creation/hydration; `None` for steps
    /// whose type is not registered (forward-compatibility placeholders).
    pub category: Option<NodeCategory>,
    pub position: Position,
    pub data: NodeData,
}

impl GraphNode {
    pub fn is_trigger(&self) -> bool {
        self.category == Some(NodeCategory::Trigger)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub label: Option<String>,
}

/// Offset applied to a duplicated node so it does not land exactly on top
/// of the original.
const DUPLICATE_OFFSET: f64 = 40.0;

/// In-memory node/edge collection behind the canvas.
///
/// Nodes and edges live in id-indexed maps so cascade deletion is atomic
/// and serialization never chases references. All mutations are
/// synchronous; a failed call leaves the model exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: HashMap<NodeId, GraphNode>,
    edges: HashMap<EdgeId, GraphEdge>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node from a template at the given position. The node is
    /// labelled after the template and its config is seeded from the
    /// schema defaults.
    pub fn add_node(&mut self, template: &NodeTemplate, position: Position) -> NodeId {
        let id = Uuid::new_v4();
        self.nodes.insert(
            id,
            GraphNode {
                id,
                node_type: template.node_type.clone(),
                category: Some(template.category),
                position,
                data: NodeData {
                    label: template.label.clone(),
                    description: template.description.clone(),
                    config: template.default_config(),
                    validation_errors: Vec::new(),
                },
            },
        );
        id
    }

    /// Remove a node and every edge incident to it. No-op when the id is
    /// absent; returns whether a node was removed.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if self.nodes.remove(&id).is_none() {
            return false;
        }
        self.edges.retain(|_, e| e.source != id && e.target != id);
        true
    }

    /// Connect two existing nodes. Rejected when the edge would be a self
    /// loop, when either endpoint is missing, or when an identical edge
    /// (same source, target and label) already exists.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        label: Option<String>,
    ) -> Result<EdgeId, GraphError> {
        let reason = if source == target {
            Some(EdgeRejection::SelfLoop)
        } else if !self.nodes.contains_key(&source) {
            Some(EdgeRejection::MissingSource)
        } else if !self.nodes.contains_key(&target) {
            Some(EdgeRejection::MissingTarget)
        } else if self.has_edge(source, target, label.as_deref()) {
            Some(EdgeRejection::Duplicate)
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(GraphError::InvalidEdge { reason });
        }

        let id = Uuid::new_v4();
        self.edges.insert(
            id,
            GraphEdge {
                id,
                source,
                target,
                label,
            },
        );
        Ok(id)
    }

    /// Merge a patch into the node's config. Existing keys not named by
    /// the patch are kept.
    pub fn update_node_config(
        &mut self,
        id: NodeId,
        patch: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NotFound(id))?;
        for (key, value) in patch {
            node.data.config.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    pub fn update_node_details(
        &mut self,
        id: NodeId,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NotFound(id))?;
        node.data.label = label.into();
        node.data.description = description.into();
        Ok(())
    }

    pub fn move_node(&mut self, id: NodeId, position: Position) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NotFound(id))?;
        node.position = position;
        Ok(())
    }

    /// Copy a node under a fresh id, slightly offset. Edges are not
    /// carried over.
    pub fn duplicate_node(&mut self, id: NodeId) -> Result<NodeId, GraphError> {
        let source = self.nodes.get(&id).ok_or(GraphError::NotFound(id))?;
        let mut copy = source.clone();
        copy.id = Uuid::new_v4();
        copy.position.x += DUPLICATE_OFFSET;
        copy.position.y += DUPLICATE_OFFSET;
        copy.data.validation_errors.clear();
        let new_id = copy.id;
        self.nodes.insert(new_id, copy);
        Ok(new_id)
    }

    /// Neighbours in both directions. Empty when the id is absent.
    pub fn connected_nodes(&self, id: NodeId) -> HashSet<NodeId> {
        let mut connected = HashSet::new();
        for edge in self.edges.values() {
            if edge.source == id {
                connected.insert(edge.target);
            } else if edge.target == id {
                connected.insert(edge.source);
            }
        }
        connected
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn incoming_count(&self, id: NodeId) -> usize {
        self.edges.values().filter(|e| e.target == id).count()
    }

    pub fn trigger_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values().filter(|n| n.is_trigger())
    }

    pub(crate) fn has_edge(&self, source: NodeId, target: NodeId, label: Option<&str>) -> bool {
        self.edges
            .values()
            .any(|e| e.source == source && e.target == target && e.label.as_deref() == label)
    }

    /// Insert a hydrated node, preserving its id. Serializer-only.
    pub(crate) fn restore_node(&mut self, node: GraphNode) {
        self.nodes.insert(node.id, node);
    }

    /// Insert a hydrated edge, preserving its id, under the same
    /// invariants as `add_edge`. Serializer-only.
    pub(crate) fn restore_edge(&mut self, edge: GraphEdge) -> Result<(), GraphError> {
        let reason = if edge.source == edge.target {
            Some(EdgeRejection::SelfLoop)
        } else if !self.nodes.contains_key(&edge.source) {
            Some(EdgeRejection::MissingSource)
        } else if !self.nodes.contains_key(&edge.target) {
            Some(EdgeRejection::MissingTarget)
        } else if self.has_edge(edge.source, edge.target, edge.label.as_deref()) {
            Some(EdgeRejection::Duplicate)
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(GraphError::InvalidEdge { reason });
        }
        self.edges.insert(edge.id, edge);
        Ok(())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.get_mut(&id)
    }
}
