//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Structural errors reported by forest operations.
///
/// A failed operation never leaves the forest half-modified: every check runs
/// before the first write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {child} is an ancestor of {parent}: insert would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },

    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("node {ancestor} is not an ancestor of {descendant}")]
    NotAnAncestor { ancestor: NodeId, descendant: NodeId },

    #[error("index {index} out of range for {len} children")]
    OutOfRange { index: usize, len: usize },

    #[error("node {0} has no children")]
    EmptyCollection(NodeId),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("stale iterator: forest changed from generation {expected} to {found}")]
    StaleIterator { expected: u64, found: u64 },
}

impl TreeError {
    /// Whether the caller passed a node that does not fit the requested relation.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            TreeError::CycleDetected { .. }
                | TreeError::NotAChild { .. }
                | TreeError::NotAnAncestor { .. }
        )
    }
}

/// Result type for forest operations.
pub type TreeResult<T> = Result<T, TreeError>;
