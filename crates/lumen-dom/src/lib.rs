//! Lumen DOM - Document surface
//!
//! Arena-backed document tree that the accessibility overlay projects onto.
//!
//! Features:
//! - Elements, text, attributes, class list, inline style properties
//! - Mutation log of effective changes
//! - Document-level event listeners with scoped registrations

mod node;
mod tree;
mod document;
mod dom_events;
mod mutation;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Descendants};
pub use document::Document;
pub use dom_events::{
    DomEvent, DomEventType, EventListener, ListenerGuard, ListenerId, ListenerRegistry,
};
pub use mutation::{MutationKind, MutationRecord};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// DOM error
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("Invalid node: {0:?}")]
    InvalidNode(NodeId),

    #[error("Node is not an element: {0:?}")]
    NotAnElement(NodeId),
}
