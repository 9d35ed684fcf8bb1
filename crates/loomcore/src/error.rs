use crate::graph::NodeId;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    #[error("Invalid edge: {reason}")]
    InvalidEdge { reason: EdgeRejection },
}

/// Why an attempted edge was rejected. A rejected edge leaves the model
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRejection {
    SelfLoop,
    MissingSource,
    MissingTarget,
    Duplicate,
}

impl fmt::Display for EdgeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeRejection::SelfLoop => write!(f, "source and target are the same node"),
            EdgeRejection::MissingSource => write!(f, "source node does not exist"),
            EdgeRejection::MissingTarget => write!(f, "target node does not exist"),
            EdgeRejection::Duplicate => write!(f, "an identical edge already exists"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Workflow not found: {0}")]
    NotFound(Uuid),

    #[error("Workflow has no id; create it before updating")]
    MissingId,

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
