use thiserror::Error;

use crate::dom::NodeId;

/// Errors raised by the in-memory document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("Invalid tag name '{tag}'")]
    InvalidTag { tag: String },

    #[error("Node {node} does not exist")]
    UnknownNode { node: NodeId },

    #[error("Node {node} is a text node")]
    NotAnElement { node: NodeId },

    #[error("Node {node} is not a text node")]
    NotText { node: NodeId },

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("Cannot move node {child} under its own descendant {parent}")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("Render root '#{id}' not found")]
    MissingRoot { id: String },
}
