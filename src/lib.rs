use once_cell::sync::OnceCell;
use thiserror::Error;

#[macro_use]
pub (crate) mod logging;

mod key;
mod cancellation;
mod event;
mod handler_list;
mod listener;
mod registry;

pub mod dispatch;

pub use key::Key;
pub use cancellation::CancellationState;
pub use event::{Event, EventBase, EventError, EventExt, EventResult};
pub use handler_list::HandlerList;
pub use listener::{EventPriority, Listener, ListenerFlags, RegisteredListener};
pub use registry::{EventTypeKey, EventTypeRegistry, RegistryConfig, RegistryError};
pub use dispatch::{call_event, call_event_in};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Event error: {0}")]
    Event(#[from] EventError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Registry already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, Error>;

static REGISTRY: OnceCell<EventTypeRegistry> = OnceCell::new();

// The process-wide registry. Created with the default configuration on
// first use unless `init` ran before.
pub fn registry() -> &'static EventTypeRegistry {
    REGISTRY.get_or_init(EventTypeRegistry::new)
}

// Configures the process-wide registry.
// Must be called before any event looks up its handlers.
pub fn init(config: RegistryConfig) -> Result<()> {
    if REGISTRY.get().is_some() {
        warn!("Event registry already initialized, ignoring {:?}", config);
        return Err(Error::AlreadyInitialized);
    }

    let registry = EventTypeRegistry::with_config(config)?;
    REGISTRY.set(registry).map_err(|_| Error::AlreadyInitialized)?;

    info!(
        "Event registry initialized with capacity {} and {} shards", 
        config.capacity, 
        config.shard_amount
    );
    Ok(())
}
