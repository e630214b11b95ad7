use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::{
    event::EventResult, 
    key::KeyGenerator, 
    listener::{
        EventPriority, 
        ListenerFlags, 
        RegisteredListener
    }, 
    registry::EventTypeKey, 
    Event, 
    Key
};

static HANDLER_LIST_KEYS: Lazy<KeyGenerator> = Lazy::new(|| KeyGenerator::new(1));

struct HandlerListInner {
    id: Key,
    event_type: EventTypeKey,
    listener_keys: KeyGenerator,
    // Sorted by priority, registration order within a priority.
    listeners: RwLock<Vec<RegisteredListener>>,
}

/// Listeners interested in one concrete event type.
///
/// Cloning yields another handle to the same list; equality is identity.
#[derive(Clone)]
pub struct HandlerList {
    inner: Arc<HandlerListInner>,
}

impl HandlerList {
    pub (crate) fn new(event_type: EventTypeKey) -> Self {
        Self {
            inner: Arc::new(HandlerListInner {
                id: HANDLER_LIST_KEYS.get(),
                event_type,
                listener_keys: KeyGenerator::new(1),
                listeners: RwLock::new(Vec::new()),
            })
        }
    }

    pub fn id(&self) -> Key { self.inner.id }
    pub fn event_type(&self) -> EventTypeKey { self.inner.event_type }
    pub fn event_name(&self) -> &'static str { self.inner.event_type.name() }

    pub fn register<F>(
        &self,
        priority: EventPriority,
        flags: ListenerFlags,
        listener: F,
    ) -> Key
    where
        F: Fn(&mut dyn Event) -> EventResult<()> + Send + Sync + 'static,
    {
        let key = self.inner.listener_keys.get();
        let registered = RegisteredListener::new(key, priority, flags, Arc::new(listener));

        let mut listeners = self.inner.listeners.write();
        let pos = listeners
            .iter()
            .position(|l| l.priority() > priority)
            .unwrap_or(listeners.len());
        listeners.insert(pos, registered);

        key
    }

    pub fn unregister(&self, key: Key) -> bool {
        let mut listeners = self.inner.listeners.write();
        match listeners.iter().position(|l| l.key() == key) {
            Some(pos) => {
                listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    // Snapshot in dispatch order. Listeners may register or unregister
    // while a snapshot is being walked.
    pub fn listeners(&self) -> Vec<RegisteredListener> {
        self.inner.listeners.read().clone()
    }

    pub fn listeners_by_priority(&self, priority: EventPriority) -> Vec<RegisteredListener> {
        self.inner.listeners
            .read()
            .iter()
            .filter(|l| l.priority() == priority)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize { self.inner.listeners.read().len() }
    pub fn is_empty(&self) -> bool { self.inner.listeners.read().is_empty() }
    pub fn clear(&self) { self.inner.listeners.write().clear(); }
}

impl PartialEq for HandlerList {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for HandlerList {}

impl std::fmt::Debug for HandlerList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerList")
            .field("id", &self.inner.id)
            .field("event_type", &self.inner.event_type)
            .field("listeners", &self.len())
            .finish()
    }
}
