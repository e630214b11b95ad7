use std::{
    any::Any, 
    borrow::Cow
};

use thiserror::Error;

use crate::{
    cancellation::CancellationState, 
    handler_list::HandlerList, 
    registry::{
        EventTypeKey, 
        EventTypeRegistry
    }
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event {event} is not cancellable")]
    NotCancellable { event: String },
}

pub type EventResult<T> = Result<T, EventError>;

/// State shared by every concrete event: an optional label and the
/// cancellation flags.
///
/// Concrete events embed one of these (conventionally in a field named
/// `base`) and expose it through [`Event::base`] / [`Event::base_mut`].
#[derive(Debug, Clone, Default)]
pub struct EventBase {
    name: Option<Cow<'static, str>>,
    cancellation: CancellationState,
}

impl EventBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the name reported by [`EventExt::event_name`].
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: Some(name.into()),
            cancellation: CancellationState::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn cancellation(&self) -> &CancellationState {
        &self.cancellation
    }
}

mod sealed {
    pub trait Sealed {}

    impl<E: super::Event + ?Sized> Sealed for E {}

    // Unnameable outside this crate, so the hook taking it cannot be
    // overridden by downstream event types.
    pub struct Token;
}

/// An occurrence the host reports to plugin listeners.
///
/// Implementors only provide access to their [`EventBase`] and, when the
/// occurrence can be vetoed, override [`Event::is_cancellable`]. Everything
/// else lives on [`EventExt`], which is implemented for every event and
/// cannot be implemented or overridden elsewhere.
pub trait Event: Any + Send {
    fn base(&self) -> &EventBase;
    fn base_mut(&mut self) -> &mut EventBase;

    fn is_cancellable(&self) -> bool {
        false
    }

    #[doc(hidden)]
    fn concrete_type_name(&self, _: sealed::Token) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Identity, cancellation and handler lookup shared by every [`Event`].
///
/// Every cancellation accessor fails with [`EventError::NotCancellable`]
/// when the event is not cancellable.
pub trait EventExt: sealed::Sealed {
    /// The explicit label if one was given, otherwise the concrete type's name.
    fn event_name(&self) -> &str;

    /// Identity of the concrete type. This is the registry key, never the name.
    fn type_key(&self) -> EventTypeKey;

    fn ensure_cancellable(&self) -> EventResult<()>;

    fn is_cancelled(&self) -> EventResult<bool>;
    fn set_cancelled(&mut self, value: bool) -> EventResult<()>;

    fn cancel(&mut self) -> EventResult<()> {
        self.set_cancelled(true)
    }

    fn is_finally_cancelled(&self) -> EventResult<bool>;

    /// Requests that the event ends up cancelled once dispatch completes.
    /// Listeners running later in the same pass still see
    /// [`EventExt::is_cancelled`] unchanged.
    fn set_finally_cancelled(&mut self, value: bool) -> EventResult<()>;

    fn finally_cancel(&mut self) -> EventResult<()> {
        self.set_finally_cancelled(true)
    }

    /// The handler list of the concrete type, from the process-wide registry.
    fn handlers(&self) -> HandlerList {
        crate::registry().slot_for_key(self.type_key())
    }

    fn handlers_in(&self, registry: &EventTypeRegistry) -> HandlerList {
        registry.slot_for_key(self.type_key())
    }
}

impl<E: Event + ?Sized> EventExt for E {
    fn event_name(&self) -> &str {
        self.base()
            .name()
            .unwrap_or_else(|| self.concrete_type_name(sealed::Token))
    }

    fn type_key(&self) -> EventTypeKey {
        EventTypeKey::new(
            Any::type_id(self), 
            self.concrete_type_name(sealed::Token)
        )
    }

    fn ensure_cancellable(&self) -> EventResult<()> {
        if self.is_cancellable() {
            Ok(())
        } else {
            Err(EventError::NotCancellable { 
                event: self.event_name().to_string() 
            })
        }
    }

    fn is_cancelled(&self) -> EventResult<bool> {
        self.ensure_cancellable()?;
        Ok(self.base().cancellation.is_cancelled())
    }

    fn set_cancelled(&mut self, value: bool) -> EventResult<()> {
        self.ensure_cancellable()?;
        self.base_mut().cancellation.set_cancelled(value);
        Ok(())
    }

    fn is_finally_cancelled(&self) -> EventResult<bool> {
        self.ensure_cancellable()?;
        Ok(self.base().cancellation.is_finally_cancelled())
    }

    fn set_finally_cancelled(&mut self, value: bool) -> EventResult<()> {
        self.ensure_cancellable()?;
        self.base_mut().cancellation.set_finally_cancelled(value);
        Ok(())
    }
}

/// Implements [`Event`] for a struct holding its [`EventBase`] in a field
/// named `base`. Append `cancellable` for vetoable events.
#[macro_export]
macro_rules! impl_event {
    ($ty:ty) => {
        impl $crate::Event for $ty {
            fn base(&self) -> &$crate::EventBase { &self.base }
            fn base_mut(&mut self) -> &mut $crate::EventBase { &mut self.base }
        }
    };
    ($ty:ty, cancellable) => {
        impl $crate::Event for $ty {
            fn base(&self) -> &$crate::EventBase { &self.base }
            fn base_mut(&mut self) -> &mut $crate::EventBase { &mut self.base }
            fn is_cancellable(&self) -> bool { true }
        }
    };
}
