//! Core types for the loom workflow editor
//!
//! This crate provides the framework-independent editing model: the step
//! template catalog, the mutable node/edge graph, the workflow draft DSL
//! with its serializer, and the validation engine. It performs no I/O.

mod draft;
mod error;
mod graph;
mod store;
mod template;
mod validate;

pub use draft::{
    DraftMetadata, DraftStatus, HydrateWarning, StepConnection, TriggerSpec, TriggerType,
    Variable, WorkflowDraft, WorkflowStep, from_workflow_draft, to_workflow_draft,
};
pub use error::{EdgeRejection, GraphError, StoreError};
pub use graph::{EdgeId, GraphEdge, GraphModel, GraphNode, NodeData, NodeId, Position};
pub use store::WorkflowStore;
pub use template::{
    ConfigField, FieldKind, NodeCategory, NodeTemplate, NodeTemplateRegistry, PortSpec,
};
pub use validate::{ValidationError, ValidationReport, ValidationWarning, validate};
