//! Error types for document and selector operations

use thiserror::Error;

use super::NodeId;

/// Errors from tree mutation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The insertion would produce an invalid tree
    #[error("cannot insert node {child} into {parent}: {reason}")]
    HierarchyRequest {
        parent: NodeId,
        child: NodeId,
        reason: &'static str,
    },

    /// Reference node is not a child of the given parent
    #[error("node {node} is not a child of {parent}")]
    NotAChild { parent: NodeId, node: NodeId },

    /// Attribute operation on a non-element node
    #[error("node {node} is not an element")]
    NotAnElement { node: NodeId },
}

/// Errors from selector parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unsupported selector '{selector}': {reason}")]
    Unsupported { selector: String, reason: String },
}
