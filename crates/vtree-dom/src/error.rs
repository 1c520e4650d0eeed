//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Programmer misuse: self-append, append to text, detach a root...
    #[error("invalid operation: {0}")]
    InvalidOp(&'static str),

    /// Index outside the child list's physical range
    #[error("index {0} is out of range")]
    InvalidIndex(usize),

    /// Slot vacated by a removal and not yet compacted
    #[error("index {0} points at an empty slot")]
    EmptyIndex(usize),

    /// Slot still holds a node
    #[error("index {0} is occupied")]
    OccupiedIndex(usize),

    /// Removal from a list with no live nodes
    #[error("child list is empty")]
    EmptyList,

    /// Handle does not belong to this tree
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("node name must not be empty")]
    EmptyName,

    #[error("node id must not be empty")]
    EmptyId,

    /// Id already present in a registry
    #[error("duplicate id {0:?}")]
    DuplicateId(String),
}
