//! Graph-subsystem error type.

use thiserror::Error;

use rr_core::{CoreError, NodeId};

/// Errors produced while building or loading a road network.
///
/// Lookups on a built snapshot never fail with an error: a missing node is
/// `None` and a node without edges has an empty adjacency slice.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("duplicate node {0}")]
    DuplicateNode(NodeId),

    #[error("invalid node {id}: {reason}")]
    InvalidNode { id: NodeId, reason: String },

    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge { from: NodeId, to: NodeId, reason: String },

    #[error("graph CSV parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type GraphResult<T> = Result<T, GraphError>;
