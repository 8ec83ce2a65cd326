//! Mutation Records
//!
//! Log of effective changes made to element state. Writes that leave the
//! element unchanged produce no record.

use crate::NodeId;

/// What changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Attribute set, changed or removed
    Attribute { name: String, old_value: Option<String> },
    /// Class added or removed
    Class { name: String, added: bool },
    /// Inline style property set or changed
    Style { name: String, old_value: Option<String> },
}

/// A single effective mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub kind: MutationKind,
}

impl MutationRecord {
    pub fn attribute(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self { target, kind: MutationKind::Attribute { name: name.to_string(), old_value } }
    }

    pub fn class(target: NodeId, name: &str, added: bool) -> Self {
        Self { target, kind: MutationKind::Class { name: name.to_string(), added } }
    }

    pub fn style(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self { target, kind: MutationKind::Style { name: name.to_string(), old_value } }
    }
}
