//! DOM Tree (arena-based allocation)

use crate::{DomError, MutationRecord, Node, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    mutations: Vec<MutationRecord>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()], mutations: Vec::new() }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Append `child` as the last child of `parent`.
    /// Invalid ids are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Iterate direct children
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> {
        let mut next = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        std::iter::from_fn(move || {
            let current = next;
            let node = self.get(current)?;
            next = node.next_sibling;
            Some((current, node))
        })
    }

    /// Pre-order traversal of everything below `id` (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack = Vec::new();
        if let Some(node) = self.get(id) {
            if node.first_child.is_valid() {
                stack.push(node.first_child);
            }
        }
        Descendants { tree: self, stack }
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.tag.as_str())
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            out.push_str(text);
            return out;
        }
        for (_, node) in self.descendants(id) {
            if let Some(text) = node.as_text() {
                out.push_str(text);
            }
        }
        out
    }

    /// Get an attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut crate::ElementData, DomError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(DomError::InvalidNode(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Set an attribute. Returns whether the element changed.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<bool, DomError> {
        match self.element_mut(id)?.set_attr(name, value) {
            Some(old_value) => {
                self.mutations.push(MutationRecord::attribute(id, name, old_value));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove an attribute. Returns whether the element changed.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<bool, DomError> {
        match self.element_mut(id)?.remove_attr(name) {
            Some(old) => {
                self.mutations.push(MutationRecord::attribute(id, name, Some(old)));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Check the class list
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|e| e.has_class(class))
    }

    /// Add a class. Returns whether the class list changed.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<bool, DomError> {
        let elem = self.element_mut(id)?;
        if elem.has_class(class) {
            return Ok(false);
        }
        elem.classes.push(class.to_string());
        self.mutations.push(MutationRecord::class(id, class, true));
        Ok(true)
    }

    /// Remove a class. Returns whether the class list changed.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<bool, DomError> {
        let elem = self.element_mut(id)?;
        let Some(idx) = elem.classes.iter().position(|c| c == class) else {
            return Ok(false);
        };
        elem.classes.remove(idx);
        self.mutations.push(MutationRecord::class(id, class, false));
        Ok(true)
    }

    /// Get an inline style property
    pub fn style_property(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.style_property(name)
    }

    /// Set an inline style property. Returns whether the style changed.
    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) -> Result<bool, DomError> {
        let elem = self.element_mut(id)?;
        let old = match elem.style.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) if v.as_str() == value => return Ok(false),
            Some((_, v)) => Some(std::mem::replace(v, value.to_string())),
            None => {
                elem.style.push((name.to_string(), value.to_string()));
                None
            }
        };
        self.mutations.push(MutationRecord::style(id, name, old));
        Ok(true)
    }

    /// Recorded mutations since the last drain
    pub fn mutations(&self) -> &[MutationRecord] {
        &self.mutations
    }

    /// Drain recorded mutations
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.mutations)
    }
}

/// Pre-order descendant iterator
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.get(id)?;
        if node.next_sibling.is_valid() {
            self.stack.push(node.next_sibling);
        }
        if node.first_child.is_valid() {
            self.stack.push(node.first_child);
        }
        Some((id, node))
    }
}
