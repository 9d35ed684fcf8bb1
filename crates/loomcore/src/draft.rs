use crate::graph::{EdgeId, GraphEdge, GraphModel, GraphNode, NodeData, NodeId, Position};
use crate::template::NodeTemplateRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Draft,
    Active,
    Archived,
}

/// Workflow-scoped variable. Defaults are merged under the supplied input
/// data when a test run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: String,
    #[serde(rename = "defaultValue")]
    pub default_value: serde_json::Value,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TriggerType {
    Manual,
    Cron { expression: String },
    Webhook { path: String },
    Event { event_type: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub id: Uuid,
    pub trigger_type: TriggerType,
    pub enabled: bool,
}

/// One step in the persisted workflow description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub step_type: String,
    pub name: String,
    pub description: String,
    pub config: serde_json::Map<String, serde_json::Value>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConnection {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Persisted/executable workflow description. This is the wire format the
/// persistence service and the execution runner both consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub category: String,
    pub steps: Vec<WorkflowStep>,
    pub connections: Vec<StepConnection>,
    pub triggers: Vec<TriggerSpec>,
    pub variables: Vec<Variable>,
    pub version: u32,
    pub status: DraftStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The non-graph half of a draft: everything `to_workflow_draft` needs
/// besides the model itself. Kept alongside the model by the caller so a
/// load/edit/save cycle loses nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftMetadata {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub category: String,
    pub triggers: Vec<TriggerSpec>,
    pub variables: Vec<Variable>,
    pub version: u32,
    pub status: DraftStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DraftMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            category: "general".to_string(),
            triggers: Vec::new(),
            variables: Vec::new(),
            version: 1,
            status: DraftStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stamp a save. Persistence itself is the caller's job.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Non-fatal findings from hydrating a draft. A draft never fails to
/// hydrate; problems degrade to warnings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydrateWarning {
    #[error("Step {step_id} has unregistered type '{step_type}'; kept as an opaque placeholder")]
    UnknownStepType { step_id: NodeId, step_type: String },

    #[error("Connection {connection_id} references missing step {missing}; dropped")]
    DanglingConnection { connection_id: EdgeId, missing: NodeId },

    #[error("Connection {connection_id} duplicates an earlier one; dropped")]
    DuplicateConnection { connection_id: EdgeId },

    #[error("Connection {connection_id} loops step {node} back to itself; dropped")]
    SelfLoopConnection { connection_id: EdgeId, node: NodeId },
}

/// Serialize the model into a draft. Steps and connections are emitted in
/// id order so equal models produce byte-equal drafts. Ephemeral editor
/// state (selection, in-progress gestures) is not part of the model and
/// never lands here.
pub fn to_workflow_draft(model: &GraphModel, meta: &DraftMetadata) -> WorkflowDraft {
    let mut steps: Vec<WorkflowStep> = model
        .nodes()
        .map(|n| WorkflowStep {
            id: n.id,
            step_type: n.node_type.clone(),
            name: n.data.label.clone(),
            description: n.data.description.clone(),
            config: n.data.config.clone(),
            position: n.position,
        })
        .collect();
    steps.sort_by_key(|s| s.id);

    let mut connections: Vec<StepConnection> = model
        .edges()
        .map(|e| StepConnection {
            id: e.id,
            source: e.source,
            target: e.target,
            label: e.label.clone(),
        })
        .collect();
    connections.sort_by_key(|c| c.id);

    // A draft carrying no trigger specs gets one manual spec per
    // trigger-category node, keyed by the node id, so a freshly drawn
    // graph is immediately test-runnable. Loaded specs are kept verbatim.
    let triggers = if meta.triggers.is_empty() {
        let mut derived: Vec<TriggerSpec> = model
            .trigger_nodes()
            .map(|n| TriggerSpec {
                id: n.id,
                trigger_type: TriggerType::Manual,
                enabled: true,
            })
            .collect();
        derived.sort_by_key(|t| t.id);
        derived
    } else {
        meta.triggers.clone()
    };

    WorkflowDraft {
        id: meta.id,
        name: meta.name.clone(),
        description: meta.description.clone(),
        category: meta.category.clone(),
        steps,
        connections,
        triggers,
        variables: meta.variables.clone(),
        version: meta.version,
        status: meta.status,
        created_at: meta.created_at,
        updated_at: meta.updated_at,
    }
}

/// Hydrate a draft back into a model. Steps whose type is not registered
/// are preserved opaquely (config verbatim, no category) and flagged with
/// a forward-compatibility warning; connections that cannot be restored
/// are dropped with a warning. Never fails.
pub fn from_workflow_draft(
    draft: &WorkflowDraft,
    registry: &NodeTemplateRegistry,
) -> (GraphModel, DraftMetadata, Vec<HydrateWarning>) {
    let mut model = GraphModel::new();
    let mut warnings = Vec::new();

    for step in &draft.steps {
        let category = match registry.get(&step.step_type) {
            Some(template) => Some(template.category),
            None => {
                warnings.push(HydrateWarning::UnknownStepType {
                    step_id: step.id,
                    step_type: step.step_type.clone(),
                });
                None
            }
        };
        model.restore_node(GraphNode {
            id: step.id,
            node_type: step.step_type.clone(),
            category,
            position: step.position,
            data: NodeData {
                label: step.name.clone(),
                description: step.description.clone(),
                config: step.config.clone(),
                validation_errors: Vec::new(),
            },
        });
    }

    for conn in &draft.connections {
        if conn.source == conn.target {
            warnings.push(HydrateWarning::SelfLoopConnection {
                connection_id: conn.id,
                node: conn.source,
            });
            continue;
        }
        let missing = if !model.contains_node(conn.source) {
            Some(conn.source)
        } else if !model.contains_node(conn.target) {
            Some(conn.target)
        } else {
            None
        };
        if let Some(missing) = missing {
            warnings.push(HydrateWarning::DanglingConnection {
                connection_id: conn.id,
                missing,
            });
            continue;
        }
        let edge = GraphEdge {
            id: conn.id,
            source: conn.source,
            target: conn.target,
            label: conn.label.clone(),
        };
        if model.restore_edge(edge).is_err() {
            warnings.push(HydrateWarning::DuplicateConnection {
                connection_id: conn.id,
            });
        }
    }

    let meta = DraftMetadata {
        id: draft.id,
        name: draft.name.clone(),
        description: draft.description.clone(),
        category: draft.category.clone(),
        triggers: draft.triggers.clone(),
        variables: draft.variables.clone(),
        version: draft.version,
        status: draft.status,
        created_at: draft.created_at,
        updated_at: draft.updated_at,
    };

    (model, meta, warnings)
}
