use crate::graph::{GraphModel, NodeId};
use crate::template::NodeTemplateRegistry;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{depth_first_search, Control, DfsEvent};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Structural problems that block the execute action. Editing is never
/// blocked by these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Cycle detected through node {node_id}")]
    CyclicGraph { node_id: NodeId },

    #[error("Required field '{field}' is missing on node {node_id}")]
    MissingRequiredField { node_id: NodeId, field: String },

    #[error("Workflow has no trigger step")]
    NoTriggerDefined,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    #[error("Node {node_id} has no incoming connection")]
    OrphanNode { node_id: NodeId },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Errors block execution-readiness; warnings do not.
    pub fn is_executable(&self) -> bool {
        self.errors.is_empty()
    }

    /// Stamp per-node error messages into `data.validation_errors`,
    /// replacing whatever a previous pass left there.
    pub fn annotate(&self, model: &mut GraphModel) {
        let ids: Vec<NodeId> = model.nodes().map(|n| n.id).collect();
        for id in ids {
            if let Some(node) = model.node_mut(id) {
                node.data.validation_errors.clear();
            }
        }
        for error in &self.errors {
            let node_id = match error {
                ValidationError::CyclicGraph { node_id } => *node_id,
                ValidationError::MissingRequiredField { node_id, .. } => *node_id,
                ValidationError::NoTriggerDefined => continue,
            };
            if let Some(node) = model.node_mut(node_id) {
                node.data.validation_errors.push(error.to_string());
            }
        }
    }
}

/// Validate the model against the registry's schemas. Pure: the model is
/// untouched and the report is fully determined by its inputs.
pub fn validate(model: &GraphModel, registry: &NodeTemplateRegistry) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut node_ids: Vec<NodeId> = model.nodes().map(|n| n.id).collect();
    node_ids.sort();

    if model.trigger_nodes().next().is_none() {
        report.errors.push(ValidationError::NoTriggerDefined);
    }

    for node_id in cycle_entry_nodes(model) {
        report.errors.push(ValidationError::CyclicGraph { node_id });
    }

    for id in &node_ids {
        let node = model.node(*id).expect("id taken from the model");

        if let Some(template) = registry.get(&node.node_type) {
            for field in template.config_schema.iter().filter(|f| f.required) {
                if !has_value(&node.data.config, &field.name) {
                    report.errors.push(ValidationError::MissingRequiredField {
                        node_id: *id,
                        field: field.name.clone(),
                    });
                }
            }
        }

        // A lone node on a fresh canvas is not worth warning about.
        if !node.is_trigger() && model.node_count() > 1 && model.incoming_count(*id) == 0 {
            report
                .warnings
                .push(ValidationWarning::OrphanNode { node_id: *id });
        }
    }

    report
}

fn has_value(config: &serde_json::Map<String, serde_json::Value>, field: &str) -> bool {
    match config.get(field) {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Nodes where a back edge closes a cycle, discovered by depth-first
/// traversal from the trigger nodes.
fn cycle_entry_nodes(model: &GraphModel) -> Vec<NodeId> {
    let mut graph: DiGraph<NodeId, ()> = DiGraph::new();
    let mut index_of: HashMap<NodeId, NodeIndex> = HashMap::new();

    let mut node_ids: Vec<NodeId> = model.nodes().map(|n| n.id).collect();
    node_ids.sort();
    for id in &node_ids {
        index_of.insert(*id, graph.add_node(*id));
    }
    for edge in model.edges() {
        graph.add_edge(index_of[&edge.source], index_of[&edge.target], ());
    }

    let mut starts: Vec<NodeIndex> = model.trigger_nodes().map(|n| index_of[&n.id]).collect();
    starts.sort();

    let mut entries = BTreeSet::new();
    depth_first_search(&graph, starts, |event| {
        if let DfsEvent::BackEdge(_, target) = event {
            entries.insert(graph[target]);
        }
        Control::<()>::Continue
    });

    entries.into_iter().collect()
}
