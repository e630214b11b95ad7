use crate::{
    event::EventResult, 
    handler_list::HandlerList, 
    registry::EventTypeRegistry, 
    Event, 
    EventExt
};

/// Runs every listener of the event's concrete type, then applies a pending
/// finally-cancel.
///
/// Returns whether the event ended up cancelled. Non-cancellable events
/// always report `false`. The first listener error aborts dispatch and is
/// returned to the caller.
pub fn call_event(event: &mut dyn Event) -> EventResult<bool> {
    let handlers = event.handlers();
    call_event_with(&handlers, event)
}

pub fn call_event_in(
    registry: &EventTypeRegistry, 
    event: &mut dyn Event
) -> EventResult<bool> {
    let handlers = event.handlers_in(registry);
    call_event_with(&handlers, event)
}

fn call_event_with(
    handlers: &HandlerList, 
    event: &mut dyn Event
) -> EventResult<bool> {
    for listener in handlers.listeners() {
        if let Err(err) = listener.call_event(event) {
            error!(
                "Listener {} failed while handling {}: {}", 
                listener.key(), 
                event.event_name(), 
                err
            );
            return Err(err);
        }
    }

    if !event.is_cancellable() { return Ok(false); }

    let outcome = event.base().cancellation().outcome();
    if outcome && !event.is_cancelled()? {
        debug!("Forcing {} into the cancelled state", event.event_name());
        event.set_cancelled(true)?;
    }

    Ok(outcome)
}
