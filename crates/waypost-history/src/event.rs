//! Window events and the global event target

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    PopState,
    HashChange,
}

impl EventKind {
    /// DOM event type identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PopState => "popstate",
            EventKind::HashChange => "hashchange",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Back/forward notification. Synthetic and native instances have the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopStateEvent {
    /// History state of the entry that is current after the navigation
    pub state: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashChangeEvent {
    pub old_url: String,
    pub new_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WindowEvent {
    PopState(PopStateEvent),
    HashChange(HashChangeEvent),
}

impl WindowEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            WindowEvent::PopState(_) => EventKind::PopState,
            WindowEvent::HashChange(_) => EventKind::HashChange,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type Listener = Arc<dyn Fn(&WindowEvent) + Send + Sync>;

struct Registration {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
}

/// Global event target (the `window` of the in-memory host)
///
/// Listeners run synchronously in registration order. Dispatch works on a
/// snapshot, so a listener may add or remove listeners or navigate again
/// while an event is being delivered.
#[derive(Default)]
pub struct EventTarget {
    registrations: RwLock<Vec<Registration>>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId::new();
        self.registrations.write().push(Registration { id, kind, listener });
        tracing::trace!(listener_id = %id, kind = %kind, "Added event listener");
        id
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut registrations = self.registrations.write();
        let before = registrations.len();
        registrations.retain(|r| r.id != id);
        before != registrations.len()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registrations
            .read()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    pub fn dispatch_event(&self, event: &WindowEvent) {
        let kind = event.kind();
        let snapshot: Vec<Listener> = self
            .registrations
            .read()
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.listener.clone())
            .collect();

        tracing::trace!(kind = %kind, listeners = snapshot.len(), "Dispatching event");

        for listener in snapshot {
            listener(event);
        }
    }
}

impl std::fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTarget")
            .field("listeners", &self.registrations.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn popstate() -> WindowEvent {
        WindowEvent::PopState(PopStateEvent::default())
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let target = EventTarget::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let order = order.clone();
            target.add_event_listener(
                EventKind::PopState,
                Arc::new(move |_| order.lock().push(n)),
            );
        }

        target.dispatch_event(&popstate());
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_dispatch_filters_by_kind() {
        let target = EventTarget::new();
        let hits = Arc::new(Mutex::new(0));
        let counter = hits.clone();
        target.add_event_listener(
            EventKind::HashChange,
            Arc::new(move |_| *counter.lock() += 1),
        );

        target.dispatch_event(&popstate());
        assert_eq!(*hits.lock(), 0);

        target.dispatch_event(&WindowEvent::HashChange(HashChangeEvent {
            old_url: "https://x.test/#a".to_string(),
            new_url: "https://x.test/#b".to_string(),
        }));
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn test_remove_listener() {
        let target = EventTarget::new();
        let id = target.add_event_listener(EventKind::PopState, Arc::new(|_| {}));
        assert_eq!(target.listener_count(EventKind::PopState), 1);
        assert!(target.remove_event_listener(id));
        assert!(!target.remove_event_listener(id));
        assert_eq!(target.listener_count(EventKind::PopState), 0);
    }

    #[test]
    fn test_listener_may_register_during_dispatch() {
        let target = Arc::new(EventTarget::new());
        let inner = target.clone();
        target.add_event_listener(
            EventKind::PopState,
            Arc::new(move |_| {
                inner.add_event_listener(EventKind::PopState, Arc::new(|_| {}));
            }),
        );

        target.dispatch_event(&popstate());
        assert_eq!(target.listener_count(EventKind::PopState), 2);
    }

    #[test]
    fn test_event_serializes_with_dom_type() {
        let json = serde_json::to_value(popstate()).unwrap();
        assert_eq!(json["type"], "popstate");
    }
}
