use std::sync::Arc;

use bitflags::bitflags;

use crate::{
    event::EventResult, 
    Event, 
    EventExt, 
    Key
};

// Listeners run from Lowest to Monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventPriority {
    Lowest,
    Low,
    #[default]
    Normal,
    High,
    Highest,
    Monitor,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ListenerFlags: u32 {
        // Skip the listener while the event is visibly cancelled.
        const IGNORE_CANCELLED = 1 << 0;
    }
}

pub type Listener = Arc<dyn Fn(&mut dyn Event) -> EventResult<()> + Send + Sync>;

#[derive(Clone)]
pub struct RegisteredListener {
    key: Key,
    priority: EventPriority,
    flags: ListenerFlags,
    callback: Listener,
}

impl RegisteredListener {
    pub (crate) fn new(
        key: Key,
        priority: EventPriority,
        flags: ListenerFlags,
        callback: Listener,
    ) -> Self {
        Self { key, priority, flags, callback }
    }

    pub fn key(&self) -> Key { self.key }
    pub fn priority(&self) -> EventPriority { self.priority }
    pub fn flags(&self) -> ListenerFlags { self.flags }

    pub fn is_ignoring_cancelled(&self) -> bool {
        self.flags.contains(ListenerFlags::IGNORE_CANCELLED)
    }

    pub fn call_event(&self, event: &mut dyn Event) -> EventResult<()> {
        if self.is_ignoring_cancelled()
            && event.is_cancellable()
            && event.is_cancelled()?
        {
            return Ok(());
        }
        (self.callback)(event)
    }
}

impl std::fmt::Debug for RegisteredListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredListener")
            .field("key", &self.key)
            .field("priority", &self.priority)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::EventBase;

    #[derive(Default)]
    struct BlockBreak {
        base: EventBase,
    }
    crate::impl_event!(BlockBreak, cancellable);

    #[derive(Default)]
    struct ChunkLoad {
        base: EventBase,
    }
    crate::impl_event!(ChunkLoad);

    fn counting(counter: &Arc<AtomicUsize>, flags: ListenerFlags) -> RegisteredListener {
        let counter = Arc::clone(counter);
        RegisteredListener::new(
            Key::new(1),
            EventPriority::Normal,
            flags,
            Arc::new(move |_: &mut dyn Event| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )
    }

    #[test]
    fn test_priority_order() {
        assert!(EventPriority::Lowest < EventPriority::Low);
        assert!(EventPriority::Low < EventPriority::Normal);
        assert!(EventPriority::Normal < EventPriority::High);
        assert!(EventPriority::High < EventPriority::Highest);
        assert!(EventPriority::Highest < EventPriority::Monitor);
        assert_eq!(EventPriority::default(), EventPriority::Normal);
    }

    #[test]
    fn test_ignore_cancelled_skips_cancelled_event() {
        let counter = Arc::new(AtomicUsize::new(0));
        let listener = counting(&counter, ListenerFlags::IGNORE_CANCELLED);

        let mut event = BlockBreak::default();
        listener.call_event(&mut event).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        event.cancel().unwrap();
        listener.call_event(&mut event).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ignore_cancelled_does_not_see_finally_cancel() {
        let counter = Arc::new(AtomicUsize::new(0));
        let listener = counting(&counter, ListenerFlags::IGNORE_CANCELLED);

        let mut event = BlockBreak::default();
        event.finally_cancel().unwrap();
        listener.call_event(&mut event).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ignore_cancelled_on_non_cancellable_event() {
        let counter = Arc::new(AtomicUsize::new(0));
        let listener = counting(&counter, ListenerFlags::IGNORE_CANCELLED);

        let mut event = ChunkLoad::default();
        listener.call_event(&mut event).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_errors_propagate() {
        let listener = RegisteredListener::new(
            Key::new(2),
            EventPriority::High,
            ListenerFlags::empty(),
            Arc::new(|event: &mut dyn Event| event.cancel()),
        );
        let mut event = ChunkLoad::default();
        assert!(matches!(
            listener.call_event(&mut event),
            Err(crate::EventError::NotCancellable { .. })
        ));
    }
}
