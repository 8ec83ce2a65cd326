//! Document - High-level document API

use crate::{
    DomEvent, DomEventType, DomTree, EventListener, ListenerGuard, ListenerRegistry,
    MutationRecord, NodeId,
};
use std::rc::Rc;

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Listeners attached at the document root
    listeners: ListenerRegistry,
}

impl Document {
    /// Create a new empty document
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        // Create basic document structure
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            listeners: ListenerRegistry::new(),
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// First element in document order whose tag is one of `tags`
    pub fn query_first(&self, tags: &[&str]) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|(_, node)| {
                node.as_element()
                    .is_some_and(|e| tags.iter().any(|t| e.tag.eq_ignore_ascii_case(t)))
            })
            .map(|(id, _)| id)
    }

    /// Listener registry at the document root
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Register a document-level listener
    #[must_use = "dropping the guard unregisters the listener"]
    pub fn add_event_listener(
        &self,
        event_type: DomEventType,
        listener: Rc<dyn EventListener>,
    ) -> ListenerGuard {
        self.listeners.add(event_type, listener)
    }

    /// Deliver an event to document-level listeners. Returns how many were notified.
    pub fn dispatch_event(&self, event: &DomEvent) -> usize {
        if self.tree.get(event.target).is_none() {
            tracing::debug!(node = ?event.target, "dropping event for unknown node");
            return 0;
        }
        // Snapshot first so listeners may (un)register while handling
        let listeners = self.listeners.snapshot(event.event_type);
        for listener in &listeners {
            listener.handle_event(self, event);
        }
        listeners.len()
    }

    /// Drain recorded mutations
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        self.tree.take_mutations()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder(RefCell<Vec<NodeId>>);

    impl EventListener for Recorder {
        fn handle_event(&self, _document: &Document, event: &DomEvent) {
            self.0.borrow_mut().push(event.target);
        }
    }

    #[test]
    fn test_basic_structure() {
        let doc = Document::new("https://example.com/");
        assert_eq!(doc.tree().tag_name(doc.document_element()), Some("html"));
        assert_eq!(doc.tree().parent(doc.body()), Some(doc.document_element()));
        assert_eq!(doc.url(), "https://example.com/");
    }

    #[test]
    fn test_query_first_in_document_order() {
        let mut doc = Document::default();
        let body = doc.body();
        let tree = doc.tree_mut();
        let h2 = tree.create_element("h2");
        let h1 = tree.create_element("H1");
        tree.append_child(body, h2);
        tree.append_child(body, h1);

        assert_eq!(doc.query_first(&["h1", "h2"]), Some(h2));
        assert_eq!(doc.query_first(&["h1"]), Some(h1));
        assert_eq!(doc.query_first(&["table"]), None);
    }

    #[test]
    fn test_dispatch_reaches_matching_listeners() {
        let doc = Document::default();
        let recorder = Rc::new(Recorder(RefCell::new(Vec::new())));
        let _guard = doc.add_event_listener(DomEventType::MouseOver, recorder.clone());

        assert_eq!(doc.dispatch_event(&DomEvent::mouse_over(doc.body(), 0.0)), 1);
        assert_eq!(recorder.0.borrow().as_slice(), &[doc.body()]);
    }

    #[test]
    fn test_dispatch_to_unknown_node_is_dropped() {
        let doc = Document::default();
        let recorder = Rc::new(Recorder(RefCell::new(Vec::new())));
        let _guard = doc.add_event_listener(DomEventType::MouseOver, recorder.clone());

        assert_eq!(doc.dispatch_event(&DomEvent::mouse_over(NodeId::NONE, 0.0)), 0);
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_dropped_guard_stops_delivery() {
        let doc = Document::default();
        let recorder = Rc::new(Recorder(RefCell::new(Vec::new())));
        let guard = doc.add_event_listener(DomEventType::MouseOver, recorder.clone());
        drop(guard);

        assert_eq!(doc.dispatch_event(&DomEvent::mouse_over(doc.body(), 0.0)), 0);
        assert!(recorder.0.borrow().is_empty());
    }
}
