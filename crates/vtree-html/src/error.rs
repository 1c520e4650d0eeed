//! Rendering errors

use vtree_dom::NodeId;

/// Result type for rendering
pub type RenderResult<T> = Result<T, RenderError>;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Handle does not belong to the rendered tree
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
