//! DOM Events
//!
//! Pointer events and the document-level listener registry.

use crate::{Document, NodeId};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// DOM event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEventType {
    MouseOver,
}

/// DOM event
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub event_type: DomEventType,
    /// Deepest node the event was fired at
    pub target: NodeId,
    /// Milliseconds since the document's time origin
    pub timestamp: f64,
}

impl DomEvent {
    /// Create mouseover event
    pub fn mouse_over(target: NodeId, timestamp: f64) -> Self {
        Self { event_type: DomEventType::MouseOver, target, timestamp }
    }
}

/// Receives events dispatched at the document root
pub trait EventListener {
    fn handle_event(&self, document: &Document, event: &DomEvent);
}

/// Registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    event_type: DomEventType,
    listener: Rc<dyn EventListener>,
}

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    entries: Vec<Registration>,
}

/// Document-level listener registry.
///
/// Cloning yields another handle onto the same registry.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ListenerRegistry")
            .field("listeners", &inner.entries.len())
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the guard is dropped.
    #[must_use = "dropping the guard unregisters the listener"]
    pub fn add(&self, event_type: DomEventType, listener: Rc<dyn EventListener>) -> ListenerGuard {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner.entries.push(Registration { id, event_type, listener });
        tracing::trace!(?id, ?event_type, "listener registered");
        ListenerGuard { id, registry: Rc::downgrade(&self.inner) }
    }

    /// Unregister by id. Returns whether a listener was removed.
    pub fn remove(&self, id: ListenerId) -> bool {
        remove_from(&self.inner, id)
    }

    /// Number of listeners for an event type
    pub fn listener_count(&self, event_type: DomEventType) -> usize {
        self.inner.borrow().entries.iter().filter(|r| r.event_type == event_type).count()
    }

    /// Check whether an id is still registered
    pub fn contains(&self, id: ListenerId) -> bool {
        self.inner.borrow().entries.iter().any(|r| r.id == id)
    }

    /// Listeners for an event type, in registration order
    pub fn snapshot(&self, event_type: DomEventType) -> Vec<Rc<dyn EventListener>> {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|r| r.event_type == event_type)
            .map(|r| Rc::clone(&r.listener))
            .collect()
    }
}

fn remove_from(inner: &RefCell<RegistryInner>, id: ListenerId) -> bool {
    let mut inner = inner.borrow_mut();
    let before = inner.entries.len();
    inner.entries.retain(|r| r.id != id);
    let removed = inner.entries.len() != before;
    if removed {
        tracing::trace!(?id, "listener unregistered");
    }
    removed
}

/// Scoped listener registration, released on drop
#[derive(Debug)]
pub struct ListenerGuard {
    id: ListenerId,
    registry: Weak<RefCell<RegistryInner>>,
}

impl ListenerGuard {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            remove_from(&inner, self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counter(Cell<usize>);

    impl EventListener for Counter {
        fn handle_event(&self, _document: &Document, _event: &DomEvent) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_mouse_over_event() {
        let event = DomEvent::mouse_over(NodeId(5), 12.0);
        assert_eq!(event.event_type, DomEventType::MouseOver);
        assert_eq!(event.target, NodeId(5));
        assert_eq!(event.timestamp, 12.0);
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let registry = ListenerRegistry::new();
        let counter = Rc::new(Counter(Cell::new(0)));
        let guard = registry.add(DomEventType::MouseOver, counter);
        assert_eq!(registry.listener_count(DomEventType::MouseOver), 1);
        assert!(registry.contains(guard.id()));

        drop(guard);
        assert_eq!(registry.listener_count(DomEventType::MouseOver), 0);
    }

    #[test]
    fn test_explicit_remove_then_drop() {
        let registry = ListenerRegistry::new();
        let guard = registry.add(DomEventType::MouseOver, Rc::new(Counter(Cell::new(0))));
        assert!(registry.remove(guard.id()));
        assert!(!registry.remove(guard.id()));
        drop(guard);
        assert_eq!(registry.listener_count(DomEventType::MouseOver), 0);
    }

    #[test]
    fn test_guard_outlives_registry() {
        let registry = ListenerRegistry::new();
        let guard = registry.add(DomEventType::MouseOver, Rc::new(Counter(Cell::new(0))));
        drop(registry);
        drop(guard);
    }
}
